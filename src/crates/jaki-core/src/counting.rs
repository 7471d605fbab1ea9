//! Exact counting for short/long compositions
//!
//! The number of ways to fill a length `n` with notes of duration 1 and 2 is
//! the Fibonacci number `F(n + 1)`: a pattern either starts with a short note
//! followed by a pattern of `n - 1`, or with a long note followed by a pattern
//! of `n - 2`. All arithmetic here is exact and checked; a closed-form
//! floating point formula drifts from the true value for large `n`.

/// Largest pattern length whose pattern count fits in a `u128`
pub const MAX_LENGTH: usize = 185;

/// Return the `n`th Fibonacci number, with `F(0) = 0` and `F(1) = F(2) = 1`
///
/// Returns `None` if the value does not fit in a `u128` (`n > 186`).
///
/// # Examples
/// ```
/// use jaki_core::fibonacci;
///
/// assert_eq!(fibonacci(0), Some(0));
/// assert_eq!(fibonacci(10), Some(55));
/// assert_eq!(fibonacci(187), None);
/// ```
pub fn fibonacci(n: usize) -> Option<u128> {
    if n == 0 {
        return Some(0);
    }

    let (mut previous, mut current): (u128, u128) = (0, 1);
    for _ in 1..n {
        let next = previous.checked_add(current)?;
        previous = current;
        current = next;
    }
    Some(current)
}

/// Number of patterns whose durations sum to `length`
pub fn pattern_count(length: usize) -> Option<u128> {
    fibonacci(length.checked_add(1)?)
}

/// Binomial coefficient `C(n, k)`, or `None` if it does not fit in a `u128`
///
/// Each step divides out the common factor first, so intermediate values
/// never exceed the final result.
pub fn binomial(n: usize, k: usize) -> Option<u128> {
    if k > n {
        return Some(0);
    }

    let k = k.min(n - k);
    let mut result: u128 = 1;
    for i in 0..k {
        // result == C(n, i) here
        let numerator = (n - i) as u128;
        let denominator = (i + 1) as u128;
        let common = gcd(result, denominator);
        result = (result / common).checked_mul(numerator / (denominator / common))?;
    }
    Some(result)
}

fn gcd(mut a: u128, mut b: u128) -> u128 {
    while b != 0 {
        let temp = b;
        b = a % b;
        a = temp;
    }
    a
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fibonacci_small() {
        let expected = [0u128, 1, 1, 2, 3, 5, 8, 13, 21, 34, 55];
        for (n, &value) in expected.iter().enumerate() {
            assert_eq!(fibonacci(n), Some(value), "F({})", n);
        }
    }

    #[test]
    fn test_fibonacci_large_is_exact() {
        // A float closed form is already off by this point
        assert_eq!(fibonacci(100), Some(354_224_848_179_261_915_075));
        assert_eq!(
            fibonacci(186),
            Some(332_825_110_087_067_562_321_196_029_789_634_457_848)
        );
        assert_eq!(fibonacci(187), None);
    }

    #[test]
    fn test_pattern_count() {
        let expected = [1u128, 1, 2, 3, 5, 8];
        for (length, &count) in expected.iter().enumerate() {
            assert_eq!(pattern_count(length), Some(count));
        }
        assert!(pattern_count(MAX_LENGTH).is_some());
        assert!(pattern_count(MAX_LENGTH + 1).is_none());
    }

    #[test]
    fn test_binomial() {
        assert_eq!(binomial(0, 0), Some(1));
        assert_eq!(binomial(5, 0), Some(1));
        assert_eq!(binomial(5, 2), Some(10));
        assert_eq!(binomial(5, 3), Some(10));
        assert_eq!(binomial(3, 5), Some(0));
        assert_eq!(binomial(50, 25), Some(126_410_606_437_752));
    }

    #[test]
    fn test_binomial_no_spurious_overflow() {
        // C(128, 64) ~ 2.4e37 fits, even though naive products would not
        assert_eq!(
            binomial(128, 64),
            Some(23_951_146_041_928_082_866_135_587_776_380_551_750)
        );
        assert_eq!(binomial(200, 100), None);
    }

    #[test]
    fn test_groups_sum_to_count() {
        for length in 0..=MAX_LENGTH {
            let total: u128 = (0..=length / 2)
                .map(|longs| binomial(length - longs, longs).unwrap())
                .sum();
            assert_eq!(Some(total), pattern_count(length), "length {}", length);
        }
    }
}
