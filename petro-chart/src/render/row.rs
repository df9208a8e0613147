use crate::chart::Borders;

use super::RowBlock;

/// Groups consecutive samples falling into the same border interval into
/// coloured depth blocks. A block reaches down to the depth of the next
/// sample. NaN values end a block.
pub(super) fn segment_blocks(
    xs: &[f64],
    ys: &[f64],
    borders: &Borders,
    colors: &[String],
) -> Vec<RowBlock> {
    let n = xs.len().min(ys.len());
    let mut blocks = Vec::new();
    let mut i = 0;
    while i < n {
        let Some(segment) = borders.segment_of(xs[i]) else {
            i += 1;
            continue;
        };
        let mut last = i;
        while last + 1 < n && borders.segment_of(xs[last + 1]) == Some(segment) {
            last += 1;
        }
        let top = ys[i];
        let bottom = if last + 1 < n { ys[last + 1] } else { ys[last] };
        if top != bottom {
            blocks.push(RowBlock {
                top,
                bottom,
                segment,
                color: colors.get(segment).cloned().unwrap_or_default(),
            });
        }
        i = last + 1;
    }
    blocks
}
