//! Plan command - show the tile grid for a bounding box without fetching.

use aerialstitch::coord::tile_to_quadkey;
use aerialstitch::grid::{plan_grid, TileGrid};

use super::common::BoundsArgs;
use crate::error::CliError;

/// Run the plan command.
pub fn run(bounds: BoundsArgs) -> Result<(), CliError> {
    let bbox = bounds.to_bbox()?;
    let grid = plan_grid(&bbox, bounds.zoom)?;

    for line in describe(&grid)? {
        println!("{}", line);
    }
    Ok(())
}

/// Human-readable summary of a planned grid.
fn describe(grid: &TileGrid) -> Result<Vec<String>, CliError> {
    let min = grid.min_tile();
    let max = grid.max_tile();
    let crop = grid.crop();

    Ok(vec![
        format!("Zoom:         {}", grid.zoom()),
        format!("Tiles x:      {}..={}", min.x, max.x),
        format!("Tiles y:      {}..={}", min.y, max.y),
        format!(
            "Grid:         {} columns x {} rows ({} tiles)",
            grid.columns(),
            grid.rows(),
            grid.tile_count()
        ),
        format!("First tile:   {}", tile_to_quadkey(&min)?),
        format!("Last tile:    {}", tile_to_quadkey(&max)?),
        format!(
            "Canvas:       {}x{} px",
            grid.canvas_width(),
            grid.canvas_height()
        ),
        format!(
            "Crop window:  left {} top {} right {} bottom {}",
            crop.left, crop.top, crop.right, crop.bottom
        ),
        format!("Output:       {}x{} px", crop.width(), crop.height()),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use aerialstitch::grid::BoundingBox;

    #[test]
    fn test_describe_campus() {
        let bbox = BoundingBox::new(42.062451, 42.049705, -87.668189, -87.686433).unwrap();
        let grid = plan_grid(&bbox, 18).unwrap();
        let lines = describe(&grid).unwrap();

        assert!(lines.contains(&"Tiles x:      67220..=67233".to_string()));
        assert!(lines.contains(&"Tiles y:      97251..=97263".to_string()));
        assert!(lines.iter().any(|l| l.contains("(182 tiles)")));
        assert!(lines.contains(&"Crop window:  left 176 top 24 right 3577 bottom 3224".to_string()));
        assert!(lines.contains(&"Output:       3401x3200 px".to_string()));
    }
}
