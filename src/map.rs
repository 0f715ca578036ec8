use anyhow::{anyhow, Context};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashSet, VecDeque};
use std::fs::File;
use std::io::{BufRead, BufReader};

use crate::common::{Cell, NodeRef, SearchNode};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Connectivity {
    #[default]
    #[serde(rename = "4")]
    Four,
    #[serde(rename = "8")]
    Eight,
}

impl Connectivity {
    fn directions(self) -> &'static [(isize, isize)] {
        match self {
            // Down, right, up, left
            Connectivity::Four => &[(1, 0), (0, 1), (-1, 0), (0, -1)],
            Connectivity::Eight => &[
                (1, 0),
                (0, 1),
                (-1, 0),
                (0, -1),
                (1, 1),
                (1, -1),
                (-1, 1),
                (-1, -1),
            ],
        }
    }
}

/// Weighted grid. A cell holds the cost of leaving it; `0` is an obstacle.
#[derive(Debug, Clone)]
pub struct Grid {
    pub height: usize,
    pub width: usize,
    pub cells: Vec<Vec<u32>>,
    pub connectivity: Connectivity,
}

impl Grid {
    pub fn uniform(height: usize, width: usize, connectivity: Connectivity) -> Self {
        Grid {
            height,
            width,
            cells: vec![vec![1; width]; height],
            connectivity,
        }
    }

    pub fn random<R: Rng + ?Sized>(
        height: usize,
        width: usize,
        obstacle_prob: f64,
        max_cost: u32,
        connectivity: Connectivity,
        rng: &mut R,
    ) -> Self {
        let mut cells = vec![vec![0; width]; height];
        for row in cells.iter_mut() {
            for cell in row.iter_mut() {
                let cost = rng.gen_range(1..=max_cost.max(1));
                *cell = if rng.gen::<f64>() < obstacle_prob { 0 } else { cost };
            }
        }
        Grid {
            height,
            width,
            cells,
            connectivity,
        }
    }

    /// Rows of `.` (cost 1), `1`-`9` (that cost) or anything else (blocked).
    pub fn from_rows(rows: &[&str]) -> Self {
        let cells: Vec<Vec<u32>> = rows
            .iter()
            .map(|row| row.chars().map(Self::parse_tile).collect())
            .collect();
        Grid {
            height: cells.len(),
            width: cells.first().map_or(0, |row| row.len()),
            cells,
            connectivity: Connectivity::Four,
        }
    }

    /// Loads a MovingAI `.map` file.
    pub fn from_file(path: &str, connectivity: Connectivity) -> anyhow::Result<Self> {
        let file = File::open(path).with_context(|| format!("cannot open map file {path}"))?;
        let mut lines = BufReader::new(file).lines();
        let mut header_value = |name: &str| -> anyhow::Result<usize> {
            let line = lines
                .next()
                .ok_or_else(|| anyhow!("map file ended before {name}"))??;
            line.split_whitespace()
                .last()
                .ok_or_else(|| anyhow!("missing value for {name}"))?
                .parse::<usize>()
                .with_context(|| format!("bad {name} in map header"))
        };

        let _type = header_value("type").ok();
        let height = header_value("height")?;
        let width = header_value("width")?;
        let _map = lines.next();

        let mut cells = Vec::with_capacity(height);
        for line in lines.take(height) {
            let row: Vec<u32> = line?.chars().take(width).map(Self::parse_tile).collect();
            if row.len() != width {
                return Err(anyhow!("map row {} has {} tiles, expected {width}", cells.len(), row.len()));
            }
            cells.push(row);
        }
        if cells.len() != height {
            return Err(anyhow!("map has {} rows, expected {height}", cells.len()));
        }

        Ok(Grid {
            height,
            width,
            cells,
            connectivity,
        })
    }

    fn parse_tile(ch: char) -> u32 {
        match ch {
            '.' | 'G' | 'S' => 1,
            '1'..='9' => ch.to_digit(10).unwrap_or(1),
            _ => 0,
        }
    }

    pub fn set_obstacle(&mut self, x: usize, y: usize) {
        self.cells[x][y] = 0;
    }

    pub fn is_passable(&self, x: usize, y: usize) -> bool {
        x < self.height && y < self.width && self.cells[x][y] != 0
    }

    pub fn get_neighbors(&self, x: usize, y: usize) -> Vec<Cell> {
        let mut neighbors = Vec::new();
        for &(dx, dy) in self.connectivity.directions() {
            let new_x = x as isize + dx;
            let new_y = y as isize + dy;
            if new_x >= 0 && new_y >= 0 && self.is_passable(new_x as usize, new_y as usize) {
                neighbors.push((new_x as usize, new_y as usize));
            }
        }
        neighbors
    }

    /// Leaving a cell costs that cell's value.
    pub fn edge_cost(&self, from: Cell, _to: Cell) -> f64 {
        self.cells[from.0][from.1] as f64
    }

    pub fn successors(&self, node: &NodeRef<Cell>) -> Vec<NodeRef<Cell>> {
        let (x, y) = node.state;
        self.get_neighbors(x, y)
            .into_iter()
            .map(|neighbor| SearchNode::child(node, neighbor, self.edge_cost(node.state, neighbor)))
            .collect()
    }

    pub fn path_exists(&self, start: Cell, goal: Cell) -> bool {
        if !self.is_passable(start.0, start.1) || !self.is_passable(goal.0, goal.1) {
            return false;
        }
        let mut visited = HashSet::from([start]);
        let mut queue = VecDeque::from([start]);
        while let Some(current) = queue.pop_front() {
            if current == goal {
                return true;
            }
            for neighbor in self.get_neighbors(current.0, current.1) {
                if visited.insert(neighbor) {
                    queue.push_back(neighbor);
                }
            }
        }
        false
    }

    /// Exact cost-to-go to `goal` for every cell (`usize::MAX` if unreachable).
    pub fn distance_table(&self, goal: Cell) -> Vec<Vec<usize>> {
        let mut distance = vec![vec![usize::MAX; self.width]; self.height];
        let mut heap = BinaryHeap::new();

        distance[goal.0][goal.1] = 0;
        heap.push((Reverse(0), goal));

        while let Some((Reverse(cost), (x, y))) = heap.pop() {
            if cost > distance[x][y] {
                continue;
            }

            for (new_x, new_y) in self.get_neighbors(x, y) {
                let next_cost = cost + self.cells[new_x][new_y] as usize;
                if next_cost < distance[new_x][new_y] {
                    heap.push((Reverse(next_cost), (new_x, new_y)));
                    distance[new_x][new_y] = next_cost;
                }
            }
        }

        distance
    }

    /// Checks that consecutive cells are adjacent and that the leaving costs
    /// add up to `cost`.
    pub fn verify_path(&self, path: &[Cell], cost: f64) -> bool {
        let mut total = 0.0;
        for step in path.windows(2) {
            let (from, to) = (step[0], step[1]);
            if !self.get_neighbors(from.0, from.1).contains(&to) {
                return false;
            }
            total += self.edge_cost(from, to);
        }
        path.first().is_some_and(|&(x, y)| self.is_passable(x, y)) && total == cost
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_read_map() {
        let map = Grid::from_file("map_file/room-8-8.map", Connectivity::Four).unwrap();

        assert_eq!(map.height, 8);
        assert_eq!(map.width, 8);

        assert!(!map.is_passable(0, 0));
        assert!(!map.is_passable(1, 0));
        assert!(!map.is_passable(0, 1));
        assert!(map.is_passable(1, 1));

        let neighbors = map.get_neighbors(1, 1);
        assert_eq!(neighbors.len(), 2);
        assert!(neighbors.contains(&(2, 1)));
        assert!(neighbors.contains(&(1, 2)));
    }

    #[test]
    fn test_read_missing_map() {
        assert!(Grid::from_file("map_file/missing.map", Connectivity::Four).is_err());
    }

    #[test]
    fn test_eight_connected_neighbors() {
        let grid = Grid::uniform(3, 3, Connectivity::Eight);
        assert_eq!(grid.get_neighbors(1, 1).len(), 8);
        assert_eq!(grid.get_neighbors(0, 0).len(), 3);
    }

    #[test]
    fn test_successors_carry_leaving_cost() {
        let grid = Grid::from_rows(&[
            "5.", //
            "..",
        ]);
        let root = SearchNode::root((0, 0), (1, 1));
        let successors = grid.successors(&root);
        assert_eq!(successors.len(), 2);
        assert!(successors.iter().all(|node| node.g_score == 5.0));
    }

    #[test]
    fn test_distance_table_and_path_exists() {
        let grid = Grid::from_rows(&[
            "..@", //
            ".3.",
            "...",
        ]);
        let table = grid.distance_table((0, 0));
        assert_eq!(table[0][0], 0);
        assert_eq!(table[2][2], 4);
        assert_eq!(table[0][2], usize::MAX);
        assert_eq!(table[1][1], 4);

        assert!(grid.path_exists((2, 2), (0, 0)));
        assert!(!grid.path_exists((2, 2), (0, 2)));
    }

    #[test]
    fn test_verify_path() {
        let grid = Grid::uniform(3, 3, Connectivity::Four);
        assert!(grid.verify_path(&[(0, 0), (0, 1), (1, 1)], 2.0));
        assert!(!grid.verify_path(&[(0, 0), (1, 1)], 1.0));
        assert!(!grid.verify_path(&[(0, 0), (0, 1)], 3.0));
    }

    #[test]
    fn test_random_grid_is_reproducible() {
        let a = Grid::random(6, 7, 0.3, 10, Connectivity::Eight, &mut StdRng::seed_from_u64(3));
        let b = Grid::random(6, 7, 0.3, 10, Connectivity::Eight, &mut StdRng::seed_from_u64(3));
        assert_eq!(a.cells, b.cells);
        assert_eq!((a.height, a.width), (6, 7));
        assert!(a.cells.iter().flatten().all(|&c| c <= 10));
    }
}
