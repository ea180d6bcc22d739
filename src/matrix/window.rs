use ndarray::Array2;

use crate::alphabet::{GAP, OUTSIDE};
use crate::reads::RefOp;

/// One read's contribution to a window: its reduced CIGAR program, its
/// aligned (soft-clip-stripped) query bases, and its reference start.
pub struct ReadSpan<'a> {
    pub ops: &'a [RefOp],
    pub aligned_seq: &'a [u8],
    pub read_start: i64,
}

/// `N_reads x columns` character matrix produced by [`WindowMaterializer`].
///
/// Column index does **not** generally equal `ref_pos - win_start`: every
/// insertion column emitted ahead of a reference position shifts all
/// subsequent match/delete columns to the right. `ref_column` records,
/// for each reference position in `[win_start, win_end)`, the matrix
/// column that carries that position's match/delete-phase observation —
/// callers that need to locate a specific reference column (C3's
/// accumulation, C5's pair lookup) must go through [`ProjectedMatrix::column_for`]
/// rather than subtracting `win_start` themselves.
pub struct ProjectedMatrix {
    pub win_start: i64,
    pub cells: Array2<char>,
    ref_column: Vec<usize>,
}

impl ProjectedMatrix {
    pub fn n_reads(&self) -> usize {
        self.cells.nrows()
    }

    pub fn n_columns(&self) -> usize {
        self.cells.ncols()
    }

    pub fn row(&self, r: usize) -> ndarray::ArrayView1<char> {
        self.cells.row(r)
    }

    /// The matrix column carrying the match/delete-phase observation for
    /// `ref_pos`, or `None` if `ref_pos` falls outside the materialized
    /// window.
    pub fn column_for(&self, ref_pos: i64) -> Option<usize> {
        let idx = ref_pos - self.win_start;
        if idx < 0 {
            return None;
        }
        self.ref_column.get(idx as usize).copied()
    }

    /// Every reference position covered by this window, paired with the
    /// matrix column carrying its match/delete-phase observation.
    pub fn reference_columns(&self) -> impl Iterator<Item = (i64, usize)> + '_ {
        self.ref_column
            .iter()
            .enumerate()
            .map(move |(i, &col)| (self.win_start + i as i64, col))
    }
}

/// Per-read walk state used while materializing a window. Tracks position
/// in the reduced CIGAR program independently of reference column so that
/// insertion columns (which do not advance the reference coordinate) can be
/// drained before the shared match/delete phase runs.
struct Cursor<'a> {
    ops: &'a [RefOp],
    aligned_seq: &'a [u8],
    op_idx: usize,
    op_off: u32,
    q_pos: usize,
    r_pos: i64,
    entered: bool,
    exited: bool,
}

impl<'a> Cursor<'a> {
    fn new(span: &ReadSpan<'a>, win_start: i64) -> Self {
        let mut cursor = Cursor {
            ops: span.ops,
            aligned_seq: span.aligned_seq,
            op_idx: 0,
            op_off: 0,
            q_pos: 0,
            r_pos: span.read_start,
            entered: false,
            exited: span.ops.is_empty(),
        };

        if cursor.r_pos < win_start {
            while cursor.r_pos < win_start && !cursor.exited {
                cursor.advance();
            }
            cursor.entered = true;
        } else if cursor.r_pos == win_start {
            cursor.entered = true;
        }

        cursor
    }

    fn current_op(&self) -> Option<RefOp> {
        if self.exited {
            None
        } else {
            self.ops.get(self.op_idx).copied()
        }
    }

    fn is_insert_pending(&self) -> bool {
        matches!(self.current_op(), Some(RefOp::Ins(_)))
    }

    /// Advances the cursor by exactly one base unit of the current op.
    fn advance(&mut self) {
        let op = match self.ops.get(self.op_idx) {
            Some(op) => *op,
            None => {
                self.exited = true;
                return;
            }
        };

        match op {
            RefOp::Match(_) => {
                self.q_pos += 1;
                self.r_pos += 1;
            }
            RefOp::Ins(_) => {
                self.q_pos += 1;
            }
            RefOp::Del(_) => {
                self.r_pos += 1;
            }
        }

        self.op_off += 1;
        if self.op_off == op.len() {
            self.op_idx += 1;
            self.op_off = 0;
            if self.op_idx >= self.ops.len() {
                self.exited = true;
            }
        }
    }

    /// Emits one insertion-phase character. Caller has already checked
    /// `is_insert_pending`.
    fn emit_insert(&mut self) -> char {
        let c = self.aligned_seq[self.q_pos] as char;
        self.advance();
        c
    }

    /// Emits one match/delete-phase character for reference column
    /// `cur_ref`.
    fn emit_match_or_delete(&mut self, cur_ref: i64) -> char {
        if self.r_pos == cur_ref {
            self.entered = true;
        }

        if self.exited || !self.entered {
            return OUTSIDE;
        }

        match self.current_op() {
            Some(RefOp::Match(_)) => {
                let c = self.aligned_seq[self.q_pos] as char;
                self.advance();
                c
            }
            Some(RefOp::Del(_)) => {
                self.advance();
                GAP
            }
            _ => OUTSIDE,
        }
    }
}

/// C2 — projects a set of reads overlapping `[win_start, win_end)` into a
/// dense, column-aligned character matrix.
pub struct WindowMaterializer;

impl WindowMaterializer {
    pub fn materialize(win_start: i64, win_end: i64, reads: &[ReadSpan]) -> ProjectedMatrix {
        let mut cursors: Vec<Cursor> = reads.iter().map(|r| Cursor::new(r, win_start)).collect();
        let mut rows: Vec<Vec<char>> = vec![Vec::new(); reads.len()];
        let mut ref_column = Vec::with_capacity((win_end - win_start).max(0) as usize);
        let mut cur_ref = win_start;
        let mut col_idx = 0usize;

        while cur_ref < win_end {
            loop {
                let inserting: Vec<bool> =
                    cursors.iter().map(|c| c.is_insert_pending()).collect();
                if !inserting.iter().any(|&b| b) {
                    break;
                }
                for (i, cursor) in cursors.iter_mut().enumerate() {
                    let c = if inserting[i] {
                        cursor.emit_insert()
                    } else {
                        GAP
                    };
                    rows[i].push(c);
                }
                col_idx += 1;
            }

            for (i, cursor) in cursors.iter_mut().enumerate() {
                rows[i].push(cursor.emit_match_or_delete(cur_ref));
            }
            ref_column.push(col_idx);
            col_idx += 1;

            cur_ref += 1;
        }

        let n_reads = reads.len();
        let n_cols = rows.first().map(|r| r.len()).unwrap_or(0);
        let flat: Vec<char> = rows.into_iter().flatten().collect();
        let cells = Array2::from_shape_vec((n_reads, n_cols), flat)
            .expect("all rows advance in lockstep and must share one length");

        ProjectedMatrix {
            win_start,
            cells,
            ref_column,
        }
    }
}
