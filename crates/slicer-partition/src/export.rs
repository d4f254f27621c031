//! Plain-text section export, grounded on the original source's
//! `editor_export_sections_stdout` (same line format, same flush-at-end
//! contract), generalised to any `std::io::Write` sink instead of stdout.

use std::io::{self, Write};

use crate::section::Section;

/// Write one `section_<i> { x: <x>, y: <y>, w: <w>, h: <h> }` line per
/// section, in leaf-traversal order, then flush.
pub fn export_sections<W: Write>(writer: &mut W, sections: &[Section]) -> io::Result<()>
{
    for (i, section) in sections.iter().enumerate()
    {
        writeln!(
            writer,
            "section_{i} {{ x: {}, y: {}, w: {}, h: {} }}",
            section.x, section.y, section.w, section.h
        )?;
    }
    writer.flush()
}
