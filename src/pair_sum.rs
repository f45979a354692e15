use std::collections::HashSet;

/// True when some `ai` in `a` and `bi` in `b` add up to `v`.
///
/// Runs in O(n + m): `a` is hashed once, then `b` is scanned for complements.
/// Missing inputs answer `false`.
pub(crate) fn can_sum_to(a: Option<&[i64]>, b: Option<&[i64]>, v: Option<i64>) -> bool {
    let (Some(a), Some(b), Some(v)) = (a, b, v) else {
        return false;
    };
    let seen: HashSet<i64> = a.iter().copied().collect();
    b.iter()
        .filter_map(|&bi| v.checked_sub(bi))
        .any(|want| seen.contains(&want))
}

#[cfg(test)]
mod tests {
    use super::*;

    const A: [i64; 4] = [10, 40, 5, 280];
    const B: [i64; 5] = [234, 5, 2, 148, 23];

    #[test]
    fn startup_case_finds_forty_plus_two() {
        assert!(can_sum_to(Some(&A[..]), Some(&B[..]), Some(42)));
    }

    #[test]
    fn no_pair() {
        assert!(!can_sum_to(Some(&A[..]), Some(&B[..]), Some(1000)));
        assert!(!can_sum_to(Some(&A[..]), Some(&B[..]), Some(11)));
    }

    #[test]
    fn empty_and_absent() {
        assert!(!can_sum_to(Some(&[][..]), Some(&B[..]), Some(42)));
        assert!(!can_sum_to(Some(&A[..]), Some(&[][..]), Some(42)));
        assert!(!can_sum_to(None, Some(&B[..]), Some(42)));
        assert!(!can_sum_to(Some(&A[..]), None, Some(42)));
        assert!(!can_sum_to(Some(&A[..]), Some(&B[..]), None));
    }

    #[test]
    fn matches_brute_force() {
        let a = [-7, 0, 3, 3, 12];
        let b = [4, -3, 9, 0];
        for v in -20..=30 {
            let brute = a.iter().any(|x| b.iter().any(|y| x + y == v));
            assert_eq!(can_sum_to(Some(&a[..]), Some(&b[..]), Some(v)), brute, "v = {v}");
        }
    }

    #[test]
    fn overflowing_complement_is_skipped() {
        assert!(!can_sum_to(Some(&[0][..]), Some(&[-1][..]), Some(i64::MAX)));
        assert!(can_sum_to(Some(&[i64::MAX][..]), Some(&[-1][..]), Some(i64::MAX - 1)));
    }
}
