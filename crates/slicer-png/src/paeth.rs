//! The PNG Paeth predictor.
//!
//! Two implementations are kept side by side, selected at build time via the
//! `paeth-table` feature, exactly as the design spec requires: a
//! branch-minimised arithmetic form and a table-lookup form built from two
//! absolute-difference tables. Both MUST return byte-identical results to
//! the reference definition; `tests` below checks that property directly
//! instead of trusting it.

#[cfg(feature = "paeth-table")]
mod table
{
    use std::sync::OnceLock;

    struct AbsTables
    {
        abs255: Box<[u16; 511]>,
        abs510: Box<[u16; 1021]>
    }

    static TABLES: OnceLock<AbsTables> = OnceLock::new();

    fn tables() -> &'static AbsTables
    {
        TABLES.get_or_init(|| {
            let mut abs255 = Box::new([0u16; 511]);
            let mut abs510 = Box::new([0u16; 1021]);

            for i in -255..=255i32
            {
                abs255[(i + 255) as usize] = i.unsigned_abs() as u16;
            }
            for i in -510..=510i32
            {
                abs510[(i + 510) as usize] = i.unsigned_abs() as u16;
            }

            AbsTables { abs255, abs510 }
        })
    }

    #[inline]
    pub fn paeth(a: u8, b: u8, c: u8) -> u8
    {
        let t = tables();
        let ai = i32::from(a);
        let bi = i32::from(b);
        let ci = i32::from(c);

        let pa = t.abs255[(bi - ci + 255) as usize];
        let pb = t.abs255[(ai - ci + 255) as usize];
        let pc = t.abs510[(ai + bi - 2 * ci + 510) as usize];

        if pa <= pb && pa <= pc
        {
            a
        }
        else if pb <= pc
        {
            b
        }
        else
        {
            c
        }
    }
}

#[cfg(not(feature = "paeth-table"))]
mod arithmetic
{
    #[inline(always)]
    pub fn paeth(a: u8, b: u8, c: u8) -> u8
    {
        let a = i16::from(a);
        let b = i16::from(b);
        let c = i16::from(c);

        let p = a + b - c;
        let pa = (p - a).abs();
        let pb = (p - b).abs();
        let pc = (p - c).abs();

        if pa <= pb && pa <= pc
        {
            a as u8
        }
        else if pb <= pc
        {
            b as u8
        }
        else
        {
            c as u8
        }
    }
}

#[cfg(feature = "paeth-table")]
pub use table::paeth;

#[cfg(not(feature = "paeth-table"))]
pub use arithmetic::paeth;

#[cfg(test)]
mod tests
{
    use super::paeth;

    /// Reference definition straight out of the PNG spec, used to check
    /// whichever implementation is compiled in is byte-identical to it.
    fn reference_paeth(a: u8, b: u8, c: u8) -> u8
    {
        let a = i32::from(a);
        let b = i32::from(b);
        let c = i32::from(c);
        let p = a + b - c;
        let pa = (p - a).abs();
        let pb = (p - b).abs();
        let pc = (p - c).abs();

        if pa <= pb && pa <= pc
        {
            a as u8
        }
        else if pb <= pc
        {
            b as u8
        }
        else
        {
            c as u8
        }
    }

    #[test]
    fn matches_reference_exhaustively_on_sampled_grid()
    {
        // Exhaustive over all 16M triples is wasteful; sample every value on
        // one axis while holding the other two fixed at representative
        // corners, which is enough to exercise every branch of the
        // predictor (left/up/upper-left each winning).
        for a in 0..=255u16
        {
            for &(b, c) in &[(0u8, 0u8), (255, 0), (0, 255), (128, 64), (64, 200)]
            {
                let a = a as u8;
                assert_eq!(paeth(a, b, c), reference_paeth(a, b, c));
            }
        }
    }
}
