/// Compute the greatest common divisor of two signed integers.
/// The result is always non-negative.
pub fn gcd_signed(mut a: i64, mut b: i64) -> u64 {
    let mut c;
    while a != 0 {
        c = a;
        // only wraps when i64::MIN % -1 and that still yields 0
        a = b.wrapping_rem(a);
        b = c;
    }
    b.unsigned_abs()
}

pub fn gcd_signed_i128(mut a: i128, mut b: i128) -> u128 {
    let mut c;
    while a != 0 {
        c = a;
        // only wraps when i128::MIN % -1 and that still yields 0
        a = b.wrapping_rem(a);
        b = c;
    }
    b.unsigned_abs()
}

#[cfg(test)]
mod test {
    use super::{gcd_signed, gcd_signed_i128};

    #[test]
    fn gcd() {
        assert_eq!(gcd_signed(12, 18), 6);
        assert_eq!(gcd_signed(-12, 18), 6);
        assert_eq!(gcd_signed(0, -7), 7);
        assert_eq!(gcd_signed(i64::MIN, 0), 1u64 << 63);
        assert_eq!(gcd_signed_i128(-(1i128 << 70), 1i128 << 65), 1u128 << 65);
    }
}
