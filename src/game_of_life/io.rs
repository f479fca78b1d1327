//! Pattern file I/O

use super::Grid;
use anyhow::{Context, Result};
use std::path::Path;

/// Render a grid's live cells as a single Life 1.05 block.
///
/// The block is cropped to the live cells and its header offset is relative
/// to the grid's center, so loading it back re-centers it.
pub fn grid_to_pattern(grid: &Grid) -> String {
    let mut result = String::from("#Life 1.05\n");
    let living = grid.living_cells();

    let Some((min_x, max_x, min_y, max_y)) = living.iter().fold(None, |acc, &(x, y)| match acc {
        None => Some((x, x, y, y)),
        Some((a, b, c, d)) => Some((a.min(x), b.max(x), c.min(y), d.max(y))),
    }) else {
        result.push_str("#P 0 0\n.\n");
        return result;
    };

    let origin_x = min_x as i64 - (grid.columns / 2) as i64;
    let origin_y = min_y as i64 - (grid.rows / 2) as i64;
    result.push_str(&format!("#P {} {}\n", origin_x, origin_y));
    for y in min_y..=max_y {
        for x in min_x..=max_x {
            result.push(if grid.is_alive(x, y) { '*' } else { '.' });
        }
        result.push('\n');
    }
    result
}

/// Save a grid as a Life 1.05 pattern file
pub fn save_grid_as_pattern<P: AsRef<Path>>(grid: &Grid, path: P) -> Result<()> {
    let content = grid_to_pattern(grid);

    if let Some(parent) = path.as_ref().parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    std::fs::write(&path, content)
        .with_context(|| format!("Failed to write pattern to file: {}", path.as_ref().display()))?;

    Ok(())
}

/// Create example pattern files
pub fn create_example_patterns<P: AsRef<Path>>(output_dir: P) -> Result<()> {
    let dir = output_dir.as_ref();
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create directory: {}", dir.display()))?;

    let examples = [
        ("glider.lif", "#Life 1.05\n#D Glider\n#N\n#P -1 -1\n.*.\n..*\n***\n"),
        ("rpentomino.lif", "#Life 1.05\n#D R-pentomino\n#N\n#P -1 -1\n.**\n**.\n.*.\n"),
        ("acorn.lif", "#Life 1.05\n#D Acorn\n#N\n#P -3 -1\n.*.....\n...*...\n**..***\n"),
        (
            "two_blinkers.lif",
            "#Life 1.05\n#D Two blinkers\n#N\n#P -4 0\n***\n\n#P 2 0\n***\n",
        ),
        (
            "highlife_replicator.lif",
            "#Life 1.05\n#D Replicator\n#R 23/36\n#P -2 -2\n..***\n.*..*\n*...*\n*..*.\n***..\n",
        ),
    ];

    for (name, content) in examples {
        std::fs::write(dir.join(name), content)
            .with_context(|| format!("Failed to write {}", name))?;
    }

    Ok(())
}
