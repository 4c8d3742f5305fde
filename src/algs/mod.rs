//! Algorithm module: ordered-set primitives, kill-list renumbering,
//! clique expansion and the random relation factory.

pub mod cliques;
pub mod ordered;
pub mod random;
pub mod renumber;

pub use cliques::cliques;
pub use random::random_one_to_many;
pub use renumber::{RenumberMaps, renumber_surviving};
