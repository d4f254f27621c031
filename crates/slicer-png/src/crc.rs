//! Optional CRC-32 verification, gated behind the `crc` feature.
//!
//! PNG's CRC is the same polynomial zlib uses (0xEDB88320, reflected),
//! computed here with a straightforward single-byte table instead of the
//! teacher's slice-by-8 unrolling: this is only ever run when a caller asks
//! for `confirm_crc`, never on the hot decode path, so the extra throughput
//! isn't worth the complexity.

use std::sync::OnceLock;

fn table() -> &'static [u32; 256]
{
    static TABLE: OnceLock<[u32; 256]> = OnceLock::new();

    TABLE.get_or_init(|| {
        let mut table = [0u32; 256];
        let mut n = 0;
        while n < 256
        {
            let mut c = n as u32;
            let mut k = 0;
            while k < 8
            {
                c = if c & 1 != 0 { 0xedb8_8320 ^ (c >> 1) } else { c >> 1 };
                k += 1;
            }
            table[n] = c;
            n += 1;
        }
        table
    })
}

/// CRC-32 over `chunk_type` followed by `data`, the same span the trailing
/// CRC field in a PNG chunk covers.
pub fn crc32(chunk_type: [u8; 4], data: &[u8]) -> u32
{
    let table = table();
    let mut crc = 0xffff_ffffu32;

    for &byte in chunk_type.iter().chain(data.iter())
    {
        let idx = ((crc ^ u32::from(byte)) & 0xff) as usize;
        crc = table[idx] ^ (crc >> 8);
    }

    crc ^ 0xffff_ffff
}
