//! 4-byte alignment helpers shared by the container and numeric decoders.

/// Number of padding bytes needed to bring `pos` up to the next 4-byte
/// boundary (0 if already aligned).
pub(crate) fn pad4(pos: usize) -> usize {
    (4 - (pos & 3)) & 3
}

/// Rounds `pos` up to the next 4-byte boundary.
pub(crate) fn align_up4(pos: usize) -> usize {
    pos + pad4(pos)
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case::aligned(0, 0)]
    #[case::one_off(1, 3)]
    #[case::two_off(2, 2)]
    #[case::three_off(3, 1)]
    #[case::already_aligned(4, 0)]
    fn pad4_table(#[case] pos: usize, #[case] expected: usize) {
        assert_eq!(pad4(pos), expected);
    }

    #[rstest]
    #[case::aligned(0, 0)]
    #[case::one_off(1, 4)]
    #[case::two_off(2, 4)]
    #[case::three_off(3, 4)]
    #[case::already_aligned(4, 4)]
    #[case::next_boundary(5, 8)]
    fn align_up4_table(#[case] pos: usize, #[case] expected: usize) {
        assert_eq!(align_up4(pos), expected);
    }
}
