use crate::cells::GridCoordinate;

/// Supplies the text drawn inside each cell when a grid is rendered.
pub trait GridDisplay {
    /// Render the contents of a grid cell as text.
    /// The String should be 3 glyphs long, padded if required.
    fn render_cell_body(&self, _: GridCoordinate) -> String {
        String::from("   ")
    }
}
