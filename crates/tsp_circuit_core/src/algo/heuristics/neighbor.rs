use rand::{Rng, seq::SliceRandom};

/// Local move applied to the interior of a circuit. The first and last
/// positions (the start vertex) never move.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Mutation {
    /// Exchange two distinct interior positions.
    Swap,
    /// Remove one interior element and reinsert it elsewhere in the interior.
    Relocate,
    /// Reverse a contiguous interior range.
    Reverse,
    /// Shuffle a contiguous interior range.
    Scramble,
}

impl Mutation {
    pub const ALL: [Self; 4] = [Self::Swap, Self::Relocate, Self::Reverse, Self::Scramble];

    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::ALL[rng.random_range(0..Self::ALL.len())]
    }
}

/// Copy of `solution` with one uniformly chosen [`Mutation`] applied.
pub fn generate_neighbor<R: Rng + ?Sized>(solution: &[usize], rng: &mut R) -> Vec<usize> {
    let mutation = Mutation::random(rng);
    apply_mutation(solution, mutation, rng)
}

/// Circuits with fewer than two interior positions have no distinct
/// neighbour and are returned unchanged.
pub fn apply_mutation<R: Rng + ?Sized>(
    solution: &[usize],
    mutation: Mutation,
    rng: &mut R,
) -> Vec<usize> {
    let mut neighbor = solution.to_vec();
    let size = neighbor.len();
    if size < 4 {
        return neighbor;
    }
    // Interior positions are 1..=last.
    let last = size - 2;

    match mutation {
        Mutation::Swap => {
            let i = rng.random_range(1..=last);
            let mut j = rng.random_range(1..last);
            if j >= i {
                j += 1;
            }
            neighbor.swap(i, j);
        }
        Mutation::Relocate => {
            let from = rng.random_range(1..=last);
            let element = neighbor.remove(from);
            let to = rng.random_range(1..=last);
            neighbor.insert(to, element);
        }
        Mutation::Reverse => {
            let (start, end) = interior_range(last, rng);
            neighbor[start..=end].reverse();
        }
        Mutation::Scramble => {
            let (start, end) = interior_range(last, rng);
            neighbor[start..=end].shuffle(rng);
        }
    }

    neighbor
}

/// `start < end`, both within `1..=last`.
fn interior_range<R: Rng + ?Sized>(last: usize, rng: &mut R) -> (usize, usize) {
    let start = rng.random_range(1..last);
    let end = rng.random_range(start + 1..=last);
    (start, end)
}
