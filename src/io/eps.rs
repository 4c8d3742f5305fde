//! Encapsulated PostScript sketch of a bipartite relation, for eyeballing
//! small adjacencies. Elements are drawn as a vertical column on the left,
//! nodes as a horizontal row at the bottom, with one line segment per
//! incidence. Debug output only; nothing downstream parses it.

use std::fmt::Write;

use crate::relation::OneToMany;

const MARGIN: f64 = 36.0;
const STEP: f64 = 24.0;
const DOT_RADIUS: f64 = 3.0;

impl OneToMany {
    /// Render the relation as an EPSF-3.0 document.
    pub fn to_eps_string(&self) -> String {
        let elements = self.len();
        let nodes = self.node_space();

        let width = MARGIN * 2.0 + STEP * nodes.max(1) as f64;
        let height = MARGIN * 2.0 + STEP * elements.max(1) as f64;
        let element_x = MARGIN;
        let node_y = MARGIN;
        let element_y = |e: usize| MARGIN + STEP * (elements - e) as f64;
        let node_x = |n: usize| MARGIN + STEP * (n + 1) as f64;

        let mut out = String::new();
        // Header; writing to a String cannot fail.
        let _ = writeln!(out, "%!PS-Adobe-3.0 EPSF-3.0");
        let _ = writeln!(
            out,
            "%%BoundingBox: 0 0 {} {}",
            width.ceil() as i64,
            height.ceil() as i64
        );
        let _ = writeln!(out, "%%Title: incidence relation ({elements} x {nodes})");
        let _ = writeln!(out, "%%EndComments");
        let _ = writeln!(out, "0.5 setlinewidth");

        for (e, row) in self.rows().enumerate() {
            for &n in row {
                let _ = writeln!(
                    out,
                    "newpath {:.1} {:.1} moveto {:.1} {:.1} lineto stroke",
                    element_x,
                    element_y(e),
                    node_x(n),
                    node_y
                );
            }
        }
        for e in 0..elements {
            let _ = writeln!(
                out,
                "newpath {:.1} {:.1} {DOT_RADIUS} 0 360 arc fill",
                element_x,
                element_y(e)
            );
        }
        for n in 0..nodes {
            let _ = writeln!(
                out,
                "newpath {:.1} {:.1} {DOT_RADIUS} 0 360 arc fill",
                node_x(n),
                node_y
            );
        }
        let _ = writeln!(out, "showpage");
        let _ = writeln!(out, "%%EOF");
        out
    }
}

#[cfg(test)]
mod tests {
    use crate::relation::OneToMany;

    #[test]
    fn document_structure() {
        let a = OneToMany::from_rows(vec![vec![0, 1], vec![1]]);
        let eps = a.to_eps_string();
        assert!(eps.starts_with("%!PS-Adobe-3.0 EPSF-3.0"));
        assert!(eps.contains("%%BoundingBox: 0 0 "));
        assert!(eps.trim_end().ends_with("%%EOF"));
        // one stroked segment per incidence
        assert_eq!(eps.matches("lineto stroke").count(), 3);
        // one dot per element and per node
        assert_eq!(eps.matches("arc fill").count(), 2 + 2);
    }

    #[test]
    fn empty_relation_still_renders() {
        let eps = OneToMany::new().to_eps_string();
        assert!(eps.starts_with("%!PS-Adobe-3.0 EPSF-3.0"));
        assert_eq!(eps.matches("lineto").count(), 0);
    }
}
