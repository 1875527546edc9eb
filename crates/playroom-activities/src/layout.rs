//! Layout helpers shared by the activities

use playroom_core::{ActivityError, Size, Vec2};

/// Left edges of `count` items of width `item_width` spread evenly across `width`
pub fn spread(count: usize, item_width: f32, width: f32) -> Vec<f32> {
    if count == 0 {
        return Vec::new();
    }
    let gap = ((width - item_width * count as f32) / (count as f32 + 1.0)).max(0.0);
    (0..count)
        .map(|i| gap + i as f32 * (item_width + gap))
        .collect()
}

/// Score label text
pub fn score_text(score: u32) -> String {
    format!("Score: {score}")
}

/// Level label text
pub fn level_text(level: u32) -> String {
    format!("Level {level}")
}

/// Left edges of a `columns` x `rows` grid of `cell` sized items starting at `top`
pub fn grid(columns: usize, rows: usize, cell: Size, gap: f32, width: f32, top: f32) -> Vec<Vec2> {
    let xs = spread(columns, cell.width, width);
    (0..rows)
        .flat_map(|row| {
            let y = top + row as f32 * (cell.height + gap);
            xs.iter().map(move |x| Vec2::new(*x, y))
        })
        .collect()
}

/// Fail the build when the surface is smaller than `min`
pub fn require_size(id: &str, size: Size, min: Size) -> Result<(), ActivityError> {
    if size.width < min.width || size.height < min.height {
        return Err(ActivityError::SurfaceTooSmall {
            id: id.to_string(),
            width: size.width,
            height: size.height,
        });
    }
    Ok(())
}
