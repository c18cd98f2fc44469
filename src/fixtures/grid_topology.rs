use std::collections::HashMap;

use crate::engine::graph::{EdgeTopology, Topology, VertexId};

/// A `rows` × `cols` grid with 4-directional, bidirectional adjacency. Cells are
/// numbered row-major, `0..rows*cols`; edge vertices (one per adjacent cell pair,
/// addressed through [`EdgeTopology`]) are numbered contiguously after them.
#[derive(Debug)]
pub struct GridTopology {
    rows: u32,
    cols: u32,
    edge_vertex_of: HashMap<(VertexId, VertexId), VertexId>,
    edge_pairs: Vec<(VertexId, VertexId)>,
}

impl GridTopology {
    pub fn new(rows: u32, cols: u32) -> Self {
        let mut edge_vertex_of = HashMap::new();
        let mut edge_pairs = Vec::new();
        let cell = |r: u32, c: u32| r * cols + c;

        for r in 0..rows {
            for c in 0..cols {
                if c + 1 < cols {
                    let (a, b) = (cell(r, c), cell(r, c + 1));
                    let id = rows * cols + edge_pairs.len() as u32;
                    edge_vertex_of.insert((a, b), id);
                    edge_pairs.push((a, b));
                }
                if r + 1 < rows {
                    let (a, b) = (cell(r, c), cell(r + 1, c));
                    let id = rows * cols + edge_pairs.len() as u32;
                    edge_vertex_of.insert((a, b), id);
                    edge_pairs.push((a, b));
                }
            }
        }

        GridTopology {
            rows,
            cols,
            edge_vertex_of,
            edge_pairs,
        }
    }

    pub fn rows(&self) -> u32 {
        self.rows
    }

    pub fn cols(&self) -> u32 {
        self.cols
    }

    pub fn cell(&self, row: u32, col: u32) -> VertexId {
        row * self.cols + col
    }

    fn row_col(&self, v: VertexId) -> (u32, u32) {
        (v / self.cols, v % self.cols)
    }

    fn neighbors(&self, v: VertexId) -> Vec<VertexId> {
        let (r, c) = self.row_col(v);
        let mut neighbors = Vec::with_capacity(4);
        if r > 0 {
            neighbors.push(self.cell(r - 1, c));
        }
        if r + 1 < self.rows {
            neighbors.push(self.cell(r + 1, c));
        }
        if c > 0 {
            neighbors.push(self.cell(r, c - 1));
        }
        if c + 1 < self.cols {
            neighbors.push(self.cell(r, c + 1));
        }
        neighbors
    }
}

impl Topology for GridTopology {
    fn num_vertices(&self) -> u32 {
        self.rows * self.cols
    }

    fn num_outgoing(&self, v: VertexId) -> u32 {
        self.neighbors(v).len() as u32
    }

    fn outgoing_destination(&self, v: VertexId, i: u32) -> Option<VertexId> {
        self.neighbors(v).get(i as usize).copied()
    }

    fn num_incoming(&self, v: VertexId) -> u32 {
        self.num_outgoing(v)
    }

    fn incoming_source(&self, v: VertexId, i: u32) -> Option<VertexId> {
        self.outgoing_destination(v, i)
    }
}

impl EdgeTopology for GridTopology {
    fn vertex_for_source_edge(&self, u: VertexId, v: VertexId) -> Option<VertexId> {
        let key = if u <= v { (u, v) } else { (v, u) };
        self.edge_vertex_of.get(&key).copied()
    }

    fn source_edge_for_vertex(&self, edge_vertex: VertexId) -> Option<(VertexId, VertexId, bool)> {
        let index = edge_vertex.checked_sub(self.rows * self.cols)?;
        self.edge_pairs.get(index as usize).map(|&(a, b)| (a, b, true))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn corner_cell_has_two_neighbors() {
        let grid = GridTopology::new(3, 3);
        assert_eq!(grid.num_outgoing(grid.cell(0, 0)), 2);
        assert_eq!(grid.num_outgoing(grid.cell(1, 1)), 4);
    }

    #[test]
    fn edge_vertex_round_trips_through_either_orientation() {
        let grid = GridTopology::new(2, 2);
        let a = grid.cell(0, 0);
        let b = grid.cell(0, 1);
        let edge_vertex = grid.vertex_for_source_edge(a, b).unwrap();
        assert_eq!(grid.vertex_for_source_edge(b, a), Some(edge_vertex));
        assert_eq!(grid.source_edge_for_vertex(edge_vertex), Some((a, b, true)));
    }
}
