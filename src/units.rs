#[derive(Eq, PartialEq, Copy, Clone, Debug, Hash)]
pub struct Width(pub usize);
#[derive(Eq, PartialEq, Copy, Clone, Debug, Hash)]
pub struct Height(pub usize);

#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub struct NodesCount(pub usize);
#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub struct EdgesCount(pub usize);

/// Node and edge capacity hints for a rectangular grid graph.
///
/// The edge count is the number of interior walls, the most a grid can ever have opened.
pub fn graph_size(width: Width, height: Height) -> (NodesCount, EdgesCount) {
    let (Width(w), Height(h)) = (width, height);
    let interior_walls = w.saturating_sub(1) * h + w * h.saturating_sub(1);
    (NodesCount(w * h), EdgesCount(interior_walls))
}
