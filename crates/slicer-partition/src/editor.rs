//! The editor: owns the cut list, the derived sections, and selection
//! state, and exposes the Edit API. Every mutating call either commits a
//! fully rebuilt, invariant-preserving state or leaves the prior state
//! untouched.
//!
//! Grounded on the original source's `editor_add_cut`/`editor_rotate_selected_cut`
//! /`editor_translate_cut_clamped` family in `editor_logic.c`, generalised
//! from that source's flat rectangle-split model to the BSP model this
//! design adopts (see the design notes' recorded decision).

use log::{info, trace};

use crate::bsp::{self, EditedCut, PreferenceMode};
use crate::cut::Cut;
use crate::error::RejectReason;
use crate::section::Section;

pub const CUT_MAX_COUNT: usize = 1024;
pub const SECTION_MAX_COUNT: usize = 2048;

#[derive(Copy, Clone, Eq, PartialEq, Debug, Default)]
pub enum Tool
{
    #[default]
    Draw,
    Select,
    Move
}

#[derive(Copy, Clone, Eq, PartialEq, Debug, Default)]
pub enum DragMode
{
    #[default]
    None,
    DrawingNew,
    MovingCut,
    ResizingEndpointA,
    ResizingEndpointB
}

#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum Endpoint
{
    A,
    B
}

enum SelectAfter
{
    Last,
    Exactly(Option<usize>)
}

pub struct EditorState
{
    width:  i32,
    height: i32,

    cuts:     Vec<Cut>,
    sections: Vec<Section>,

    selected_cut:     Option<usize>,
    selected_section:  Option<usize>,

    pub tool:      Tool,
    pub drag_mode: DragMode,

    grid_cols: u32,
    grid_rows: u32
}

impl EditorState
{
    pub fn new(width: i32, height: i32) -> EditorState
    {
        EditorState {
            width,
            height,
            cuts: Vec::new(),
            sections: vec![Section { x: 0, y: 0, w: width, h: height }],
            selected_cut: None,
            selected_section: Some(0),
            tool: Tool::default(),
            drag_mode: DragMode::default(),
            grid_cols: 1,
            grid_rows: 1
        }
    }

    pub fn cuts(&self) -> &[Cut]
    {
        &self.cuts
    }

    pub fn sections(&self) -> &[Section]
    {
        &self.sections
    }

    pub fn selected_cut(&self) -> Option<usize>
    {
        self.selected_cut
    }

    pub fn selected_section(&self) -> Option<usize>
    {
        self.selected_section
    }

    pub fn grid(&self) -> (u32, u32)
    {
        (self.grid_cols, self.grid_rows)
    }

    pub fn set_grid(&mut self, cols: u32, rows: u32)
    {
        self.grid_cols = cols.clamp(1, 64);
        self.grid_rows = rows.clamp(1, 64);
    }

    // -----------------------------------------------------------------
    // Edit API
    // -----------------------------------------------------------------

    pub fn add_cut(&mut self, x1: i32, y1: i32, x2: i32, y2: i32) -> bool
    {
        let Some(candidate) = Cut::new_clamped(x1, y1, x2, y2, self.width, self.height) else
        {
            trace!("AddCut rejected: {:?}", RejectReason::Degenerate);
            return false;
        };

        if self.cuts.len() >= CUT_MAX_COUNT
        {
            trace!("AddCut rejected: {:?}", RejectReason::CapacityReached);
            return false;
        }
        if self.cuts.contains(&candidate)
        {
            trace!("AddCut rejected: {:?}", RejectReason::Duplicate);
            return false;
        }

        let mut new_cuts = self.cuts.clone();
        new_cuts.push(candidate);

        self.commit_or_reject(new_cuts, None, SelectAfter::Last, "AddCut")
    }

    pub fn delete_cut(&mut self, index: usize) -> bool
    {
        if index >= self.cuts.len()
        {
            trace!("DeleteCut rejected: {:?}", RejectReason::UnknownIndex);
            return false;
        }

        let mut new_cuts = self.cuts.clone();
        new_cuts.remove(index);

        let select_after = if index > 0 { Some(index - 1) } else { None };
        self.commit_or_reject(new_cuts, None, SelectAfter::Exactly(select_after), "DeleteCut")
    }

    pub fn rotate_cut(&mut self, index: usize) -> bool
    {
        let Some(&cut) = self.cuts.get(index) else
        {
            return false;
        };

        let (cx, cy) = cut.midpoint();
        // A 3-unit perpendicular segment centred on the midpoint; any
        // length >= 2 would do, this just disambiguates the new axis
        // before the refit snaps it to a leaf's full extent.
        let (rx1, ry1, rx2, ry2) = if cut.is_vertical()
        {
            (cx - 1, cy, cx + 1, cy)
        }
        else
        {
            (cx, cy - 1, cx, cy + 1)
        };

        let Some(candidate) = Cut::new_clamped(rx1, ry1, rx2, ry2, self.width, self.height) else
        {
            return false;
        };

        let mut new_cuts = self.cuts.clone();
        new_cuts[index] = candidate;

        let edited = EditedCut { index, mode: PreferenceMode::Default, reference_span: 0 };
        self.commit_or_reject(new_cuts, Some(edited), SelectAfter::Exactly(Some(index)), "RotateCut")
    }

    pub fn resize_endpoint(&mut self, index: usize, which: Endpoint, new_x: i32, new_y: i32) -> bool
    {
        let Some(&cut) = self.cuts.get(index) else
        {
            return false;
        };
        let pre_span = cut.span();

        let (rx1, ry1, rx2, ry2) = match (cut.is_vertical(), which)
        {
            (true, Endpoint::A) => (cut.x1, new_y, cut.x2, cut.y2),
            (true, Endpoint::B) => (cut.x1, cut.y1, cut.x2, new_y),
            (false, Endpoint::A) => (new_x, cut.y1, cut.x2, cut.y2),
            (false, Endpoint::B) => (cut.x1, cut.y1, new_x, cut.y2)
        };

        let Some(candidate) = Cut::new_clamped(rx1, ry1, rx2, ry2, self.width, self.height) else
        {
            return false;
        };

        if self.cuts.iter().enumerate().any(|(i, c)| i != index && *c == candidate)
        {
            return false;
        }

        let new_span = candidate.span();
        let mode = if new_span > pre_span
        {
            PreferenceMode::PreferParent
        }
        else if new_span < pre_span
        {
            PreferenceMode::PreferChild
        }
        else
        {
            PreferenceMode::Default
        };

        let mut new_cuts = self.cuts.clone();
        new_cuts[index] = candidate;

        let edited = EditedCut { index, mode, reference_span: pre_span };
        self.commit_or_reject(
            new_cuts,
            Some(edited),
            SelectAfter::Exactly(Some(index)),
            "ResizeEndpoint"
        )
    }

    pub fn translate_cut(&mut self, index: usize, dx: i32, dy: i32) -> bool
    {
        let Some(&cut) = self.cuts.get(index) else
        {
            return false;
        };

        let (mut x1, mut y1, mut x2, mut y2) = (cut.x1 + dx, cut.y1 + dy, cut.x2 + dx, cut.y2 + dy);

        let shift_x = clamp_shift(x1.min(x2), x1.max(x2), 0, self.width - 1);
        let shift_y = clamp_shift(y1.min(y2), y1.max(y2), 0, self.height - 1);
        x1 += shift_x;
        x2 += shift_x;
        y1 += shift_y;
        y2 += shift_y;

        let Some(candidate) = Cut::new(x1, y1, x2, y2) else
        {
            return false;
        };

        if self.cuts.iter().enumerate().any(|(i, c)| i != index && *c == candidate)
        {
            return false;
        }

        let mut new_cuts = self.cuts.clone();
        new_cuts[index] = candidate;

        let edited = EditedCut { index, mode: PreferenceMode::Default, reference_span: 0 };
        self.commit_or_reject(
            new_cuts,
            Some(edited),
            SelectAfter::Exactly(Some(index)),
            "TranslateCut"
        )
    }

    /// Split the selected section into a `cols x rows` grid.
    ///
    /// The vertical cuts are generated against the section as it was
    /// before any of this call's edits, exactly as specified: each is
    /// submitted through `AddCut` in turn, and since a BSP leaf only ever
    /// grows narrower as cuts land in it, they successively carve the
    /// section into its `cols` columns. A single global horizontal
    /// candidate, though, can only ever snap into ONE of those columns
    /// (leaf selection always picks the single best-scoring leaf) — so to
    /// actually produce a full grid under this BSP model, one set of
    /// `rows-1` horizontal candidates is generated per resulting column,
    /// not once for the whole section.
    pub fn apply_grid_to_selected(&mut self, cols: u32, rows: u32) -> bool
    {
        let cols = cols.clamp(1, 64) as i32;
        let rows = rows.clamp(1, 64) as i32;

        let Some(section) = self.selected_section.and_then(|i| self.sections.get(i).copied())
        else
        {
            return false;
        };

        let mut any = false;
        for k in 1..cols
        {
            let x = section.x + (section.w * k) / cols;
            if self.add_cut(x, section.y, x, section.y + section.h - 1)
            {
                any = true;
            }
        }

        if rows > 1
        {
            let columns: Vec<Section> = self
                .sections
                .iter()
                .copied()
                .filter(|s| {
                    s.y == section.y
                        && s.h == section.h
                        && s.x >= section.x
                        && s.x + s.w <= section.x + section.w
                })
                .collect();

            for column in columns
            {
                for k in 1..rows
                {
                    let y = column.y + (column.h * k) / rows;
                    if self.add_cut(column.x, y, column.x + column.w - 1, y)
                    {
                        any = true;
                    }
                }
            }
        }

        any
    }

    // -----------------------------------------------------------------

    fn commit_or_reject(
        &mut self, new_cuts: Vec<Cut>, edited: Option<EditedCut>, select_after: SelectAfter,
        edit_name: &'static str
    ) -> bool
    {
        match bsp::build(self.width, self.height, &new_cuts, edited)
        {
            Ok((tree, snapped_cuts)) =>
            {
                self.cuts = snapped_cuts;
                self.sections = tree.sections();
                debug_assert!(self.sections.len() <= SECTION_MAX_COUNT);

                self.apply_selection(select_after);
                info!("{edit_name} committed, {} sections", self.sections.len());
                true
            }
            Err(_) =>
            {
                trace!("{edit_name} rejected: {:?}", RejectReason::NoEligibleLeaf);
                false
            }
        }
    }

    fn apply_selection(&mut self, select_after: SelectAfter)
    {
        self.selected_cut = match select_after
        {
            SelectAfter::Last => self.cuts.len().checked_sub(1),
            SelectAfter::Exactly(index) => index.filter(|&i| i < self.cuts.len())
        };

        self.selected_section = match self.selected_cut
        {
            Some(i) =>
            {
                let (mx, my) = self.cuts[i].midpoint();
                self.sections.iter().position(|s| s.contains_point(mx, my))
            }
            None if self.sections.is_empty() => None,
            None => Some(0)
        };
    }
}

/// The minimum shift needed to bring `[lo, hi]` fully inside `[bound_lo,
/// bound_hi]`, applied as a rigid-body translation.
fn clamp_shift(lo: i32, hi: i32, bound_lo: i32, bound_hi: i32) -> i32
{
    if lo < bound_lo
    {
        bound_lo - lo
    }
    else if hi > bound_hi
    {
        bound_hi - hi
    }
    else
    {
        0
    }
}
