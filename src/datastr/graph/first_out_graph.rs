//! Static graph representation as an adjacency array.
//!
//! Nodes and arcs are identified by ids from `0` to `n-1` and `m-1`.
//! We store the graph in three collections: `first_out`, `head` and `weight`.
//! `head` and `weight` have `m` elements each, `first_out` has `n+1`.
//! The first element of `first_out` is always 0 and the last one `m`, so
//! `head[first_out[u]..first_out[u+1]]` contains all neighbors of `u`.

use super::*;

/// Container struct for the three collections of a graph.
/// Generic over the types of the collections, so anything that can be
/// dereferenced to a slice works, owned or borrowed.
#[derive(Debug, Clone)]
pub struct FirstOutGraph<FirstOutContainer, HeadContainer, WeightContainer> {
    // index of the first outgoing edge of each node, +1 entry in the end
    first_out: FirstOutContainer,
    // the node each edge points to
    head: HeadContainer,
    // the weight of each edge
    weight: WeightContainer,
}

impl<FirstOutContainer, HeadContainer, WeightContainer> FirstOutGraph<FirstOutContainer, HeadContainer, WeightContainer>
where
    FirstOutContainer: AsRef<[EdgeId]>,
    HeadContainer: AsRef<[NodeId]>,
    WeightContainer: AsRef<[Weight]>,
{
    /// Borrow a slice of the first_out data
    pub fn first_out(&self) -> &[EdgeId] {
        self.first_out.as_ref()
    }
    /// Borrow a slice of the head data
    pub fn head(&self) -> &[NodeId] {
        self.head.as_ref()
    }
    /// Borrow a slice of the weight data
    pub fn weight(&self) -> &[Weight] {
        self.weight.as_ref()
    }

    /// Create a new `FirstOutGraph` from the three containers.
    pub fn new(first_out: FirstOutContainer, head: HeadContainer, weight: WeightContainer) -> Self {
        assert!(first_out.as_ref().len() < NodeId::MAX as usize);
        assert!(head.as_ref().len() < EdgeId::MAX as usize);
        assert_eq!(*first_out.as_ref().first().unwrap(), 0);
        assert_eq!(*first_out.as_ref().last().unwrap() as usize, head.as_ref().len());
        assert_eq!(weight.as_ref().len(), head.as_ref().len());

        Self { first_out, head, weight }
    }

    /// Decompose the graph into its three separate data containers
    pub fn decompose(self) -> (FirstOutContainer, HeadContainer, WeightContainer) {
        (self.first_out, self.head, self.weight)
    }

    fn neighbor_range(&self, node: NodeId) -> std::ops::Range<usize> {
        let node = node as usize;
        (self.first_out()[node] as usize)..(self.first_out()[node + 1] as usize)
    }
}

pub type OwnedGraph = FirstOutGraph<Vec<EdgeId>, Vec<NodeId>, Vec<Weight>>;

impl OwnedGraph {
    pub fn from_adjacency_lists(adjacency_lists: Vec<Vec<Link>>) -> OwnedGraph {
        // create the first_out array as a prefix sum over the adjacency list sizes
        let first_out = std::iter::once(0)
            .chain(adjacency_lists.iter().scan(0, |state, neighbors| {
                *state += neighbors.len() as EdgeId;
                Some(*state)
            }))
            .collect();

        // append all adjacency lists and split the pairs into two vectors
        let (head, weight) = adjacency_lists
            .into_iter()
            .flat_map(|neighbors| neighbors.into_iter().map(|Link { node, weight }| (node, weight)))
            .unzip();

        OwnedGraph::new(first_out, head, weight)
    }
}

impl<FirstOutContainer, HeadContainer, WeightContainer> Graph for FirstOutGraph<FirstOutContainer, HeadContainer, WeightContainer>
where
    FirstOutContainer: AsRef<[EdgeId]>,
    HeadContainer: AsRef<[NodeId]>,
    WeightContainer: AsRef<[Weight]>,
{
    fn num_nodes(&self) -> usize {
        self.first_out().len() - 1
    }

    fn num_arcs(&self) -> usize {
        self.head().len()
    }

    fn degree(&self, node: NodeId) -> usize {
        self.neighbor_range(node).len()
    }
}

impl<'a, FirstOutContainer, HeadContainer, WeightContainer> LinkIterGraph<'a> for FirstOutGraph<FirstOutContainer, HeadContainer, WeightContainer>
where
    FirstOutContainer: AsRef<[EdgeId]>,
    HeadContainer: AsRef<[NodeId]>,
    WeightContainer: AsRef<[Weight]>,
{
    type Iter = std::iter::Map<std::iter::Zip<std::slice::Iter<'a, NodeId>, std::slice::Iter<'a, Weight>>, fn((&NodeId, &Weight)) -> Link>;

    #[inline]
    fn neighbor_iter(&'a self, node: NodeId) -> Self::Iter {
        let range = self.neighbor_range(node);
        self.head()[range.clone()]
            .iter()
            .zip(self.weight()[range].iter())
            .map(|(&neighbor, &weight)| Link { node: neighbor, weight })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn adjacency_round_trip() {
        //
        //          0 ---1---> 1 ---2---> 3
        //          |          ^
        //          3          |
        //          +--------> 2 (no out arcs from 3)
        //
        let graph = OwnedGraph::from_adjacency_lists(vec![
            vec![
                Link { node: 1, weight: Weight::new(1.0) },
                Link { node: 2, weight: Weight::new(3.0) },
            ],
            vec![Link { node: 3, weight: Weight::new(2.0) }],
            vec![Link { node: 1, weight: Weight::new(1.0) }],
            vec![],
        ]);

        assert_eq!(graph.num_nodes(), 4);
        assert_eq!(graph.num_arcs(), 4);
        assert_eq!(graph.degree(0), 2);
        assert_eq!(graph.degree(3), 0);

        let links: Vec<Link> = graph.neighbor_iter(0).collect();
        assert_eq!(links[0], Link { node: 1, weight: Weight::new(1.0) });
        assert_eq!(links[1], Link { node: 2, weight: Weight::new(3.0) });
        assert!(graph.neighbor_iter(3).next().is_none());
    }

    #[test]
    fn first_out_shape() {
        let graph = OwnedGraph::new(vec![0, 2, 3, 3], vec![1, 2, 2], vec![Weight::new(1.0); 3]);
        assert_eq!(graph.num_nodes(), 3);
        assert_eq!(graph.degree(2), 0);
    }
}
