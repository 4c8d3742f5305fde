//! Topological ordering and acyclicity over a [`OneToMany`] viewed as a
//! directed graph: edge `u → v` exists iff `v ∈ rows[u]`.
//!
//! Both walks run over the joint vertex space `[0, max(len, max_node+1))`;
//! vertices at indices `>= len` have no outgoing edges but may be pointed
//! at.

use super::OneToMany;

impl OneToMany {
    /// Kahn-style topological order, in discharge order.
    ///
    /// Returns every vertex whose in-degree eventually reaches zero; on a
    /// cyclic graph the result covers only the vertices outside (and not
    /// downstream of) the cycles, so its length is less than the vertex
    /// space.
    ///
    /// # Example
    /// ```rust
    /// use incidence::relation::OneToMany;
    /// let a = OneToMany::from_rows(vec![vec![1, 2], vec![2], vec![]]);
    /// assert_eq!(a.topological_order(), vec![0, 1, 2]);
    /// ```
    pub fn topological_order(&self) -> Vec<usize> {
        let n = self.vertex_space();
        let mut in_deg = vec![0usize; n];
        for row in self.rows() {
            for &v in row {
                in_deg[v] += 1;
            }
        }
        let mut queue: std::collections::VecDeque<usize> = (0..n)
            .filter(|&u| in_deg[u] == 0)
            .collect();
        let mut order = Vec::with_capacity(n);
        while let Some(u) = queue.pop_front() {
            order.push(u);
            if let Some(row) = self.rows.get(u) {
                for &v in row {
                    in_deg[v] -= 1;
                    if in_deg[v] == 0 {
                        queue.push_back(v);
                    }
                }
            }
        }
        order
    }

    /// True iff the directed graph has no cycle. Iterative three-color
    /// depth-first search; a back-edge to an on-stack vertex is a cycle.
    pub fn is_acyclic(&self) -> bool {
        #[derive(Clone, Copy, PartialEq)]
        enum Color {
            Unseen,
            OnStack,
            Done,
        }
        let n = self.vertex_space();
        let mut color = vec![Color::Unseen; n];
        // (vertex, index of the next successor to visit)
        let mut stack: Vec<(usize, usize)> = Vec::new();
        for start in 0..n {
            if color[start] != Color::Unseen {
                continue;
            }
            color[start] = Color::OnStack;
            stack.push((start, 0));
            while let Some(top) = stack.last_mut() {
                let u = top.0;
                let row: &[usize] = self.rows.get(u).map_or(&[], Vec::as_slice);
                if top.1 < row.len() {
                    let v = row[top.1];
                    top.1 += 1;
                    match color[v] {
                        Color::OnStack => return false,
                        Color::Unseen => {
                            color[v] = Color::OnStack;
                            stack.push((v, 0));
                        }
                        Color::Done => {}
                    }
                } else {
                    color[u] = Color::Done;
                    stack.pop();
                }
            }
        }
        true
    }
}
