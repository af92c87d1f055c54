//! Capture session: the selection/merge state machine.
//!
//! A session owns the block list for one capture interaction plus two index
//! sets over it: the capture selection and the transient merge marks. Merge
//! and unmerge are the only structural mutators of the block list; both
//! recompute the index sets so they only ever reference valid indices.
//! Indices are positional and unstable across any mutation.
//!
//! The session is a plain owned value; whoever holds it is the single
//! active session. Dropping it ends the session.

use std::collections::BTreeSet;

use crate::block::Block;
use crate::error::{Error, Result};

/// Output arrangement for the composed capture
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureMode {
    /// Shortest-column masonry packing
    Horizontal,
    /// Simple vertical stacking
    Vertical,
}

/// Mutable state for one user-initiated capture interaction.
#[derive(Debug)]
pub struct CaptureSession {
    blocks: Vec<Block>,
    selected: BTreeSet<usize>,
    merge_marks: BTreeSet<usize>,
    mode: CaptureMode,
}

impl CaptureSession {
    /// Start a session over segmented blocks. Every block starts selected
    /// and nothing is marked for merge.
    ///
    /// Fails with [`Error::NoContentFound`] when segmentation produced
    /// nothing; a session over zero blocks is meaningless.
    pub fn new(blocks: Vec<Block>, mode: CaptureMode) -> Result<Self> {
        if blocks.is_empty() {
            return Err(Error::NoContentFound);
        }
        let selected = (0..blocks.len()).collect();
        Ok(Self {
            blocks,
            selected,
            merge_marks: BTreeSet::new(),
            mode,
        })
    }

    pub fn mode(&self) -> CaptureMode {
        self.mode
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn selected(&self) -> &BTreeSet<usize> {
        &self.selected
    }

    pub fn merge_marks(&self) -> &BTreeSet<usize> {
        &self.merge_marks
    }

    /// Selected blocks in document order.
    pub fn selected_blocks(&self) -> impl Iterator<Item = &Block> {
        self.selected.iter().map(|&i| &self.blocks[i])
    }

    /// Flip whether block `index` is included in the output.
    ///
    /// # Panics
    /// Out-of-range indices are a caller bug, not a user-facing failure.
    pub fn toggle_selection(&mut self, index: usize) {
        assert!(index < self.blocks.len(), "block index out of range");
        if !self.selected.remove(&index) {
            self.selected.insert(index);
        }
    }

    /// Flip whether block `index` is marked as a merge/unmerge candidate.
    /// Independent of the capture selection.
    ///
    /// # Panics
    /// Out-of-range indices are a caller bug, not a user-facing failure.
    pub fn toggle_merge_mark(&mut self, index: usize) {
        assert!(index < self.blocks.len(), "block index out of range");
        if !self.merge_marks.remove(&index) {
            self.merge_marks.insert(index);
        }
    }

    pub fn select_all(&mut self) {
        self.selected = (0..self.blocks.len()).collect();
    }

    pub fn select_none(&mut self) {
        self.selected.clear();
    }

    /// Merge the marked blocks into one.
    ///
    /// Preconditions: at least two marks, forming a contiguous run. On
    /// failure the session is unchanged. On success the run is replaced by
    /// one merged block, the selection is remapped (indices below the run
    /// keep, indices above shift down, selected indices inside the run
    /// collapse onto the merged block) and the marks are cleared.
    ///
    /// Returns the index of the merged block.
    pub fn merge(&mut self) -> Result<usize> {
        let marks: Vec<usize> = self.merge_marks.iter().copied().collect();
        if marks.len() < 2 {
            return Err(Error::InvalidMergeRange(marks.len()));
        }
        if marks.windows(2).any(|w| w[1] != w[0] + 1) {
            return Err(Error::NonContiguousMerge);
        }

        let first = marks[0];
        let count = marks.len();
        let parts: Vec<Block> = self.blocks.drain(first..first + count).collect();
        self.blocks.insert(first, Block::merged(parts));

        let old = std::mem::take(&mut self.selected);
        for i in old {
            if i < first {
                self.selected.insert(i);
            } else if i >= first + count {
                self.selected.insert(i - (count - 1));
            } else {
                self.selected.insert(first);
            }
        }
        self.merge_marks.clear();

        log::debug!("merged {} blocks at index {}", count, first);
        Ok(first)
    }

    /// Split the lowest-indexed marked merged block back into its originals.
    ///
    /// Fails with [`Error::NoMergedBlockMarked`] (session unchanged) when no
    /// marked block is merged. On success the originals are spliced back in
    /// place, the selection is remapped (a selected merged block selects all
    /// restored blocks) and the marks are cleared.
    ///
    /// Returns the number of restored blocks.
    pub fn unmerge(&mut self) -> Result<usize> {
        let index = self
            .merge_marks
            .iter()
            .copied()
            .find(|&i| self.blocks[i].is_merged())
            .ok_or(Error::NoMergedBlockMarked)?;

        let merged = self.blocks.remove(index);
        let originals = match merged.merged_from {
            Some(parts) => parts,
            // is_merged() held for this index above
            None => unreachable!("merged block without merged_from"),
        };
        let count = originals.len();
        for (offset, block) in originals.into_iter().enumerate() {
            self.blocks.insert(index + offset, block);
        }

        let old = std::mem::take(&mut self.selected);
        for i in old {
            if i < index {
                self.selected.insert(i);
            } else if i == index {
                for restored in index..index + count {
                    self.selected.insert(restored);
                }
            } else {
                self.selected.insert(i + count - 1);
            }
        }
        self.merge_marks.clear();

        log::debug!("unmerged block {} into {} blocks", index, count);
        Ok(count)
    }
}
