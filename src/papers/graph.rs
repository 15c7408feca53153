use std::collections::{BTreeSet, HashMap};

use super::record::Paper;

/// Two papers are linked only when they share more tags than this.
pub const SHARED_TAG_THRESHOLD: usize = 4;

pub const PALETTE_SIZE: u32 = 7;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GraphNode {
    /// Index into the paper collection.
    pub paper: usize,
    pub id: String,
    pub feedstock_group: u32,
}

impl GraphNode {
    pub fn palette_index(&self) -> usize {
        palette_index(self.feedstock_group)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GraphEdge {
    /// Node indices; `source` precedes `target` in collection order.
    pub source: usize,
    pub target: usize,
    pub weight: usize,
}

#[derive(Clone, Debug, Default)]
pub struct TagGraph {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
    index_by_id: HashMap<String, usize>,
}

impl TagGraph {
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node_index(&self, id: &str) -> Option<usize> {
        self.index_by_id.get(id).copied()
    }

    pub fn degree(&self, node: usize) -> usize {
        self.edges
            .iter()
            .filter(|edge| edge.source == node || edge.target == node)
            .count()
    }
}

pub fn palette_index(group: u32) -> usize {
    (group % PALETTE_SIZE) as usize
}

pub fn shared_tag_count(a: &BTreeSet<String>, b: &BTreeSet<String>) -> usize {
    a.intersection(b).count()
}

/// Numbers distinct feedstock tags from 1 in first-seen order over the whole
/// collection.
pub fn feedstock_groups(papers: &[Paper]) -> HashMap<&str, u32> {
    let mut groups = HashMap::new();
    let mut next_group = 1u32;
    for paper in papers {
        for tag in &paper.feedstock_tags {
            groups.entry(tag.as_str()).or_insert_with(|| {
                let group = next_group;
                next_group += 1;
                group
            });
        }
    }
    groups
}

/// Smallest group among the paper's own feedstock tags, 0 when it has none.
pub fn feedstock_group(paper: &Paper, groups: &HashMap<&str, u32>) -> u32 {
    paper
        .feedstock_tags
        .iter()
        .filter_map(|tag| groups.get(tag.as_str()).copied())
        .min()
        .unwrap_or(0)
}

pub fn build_graph(papers: &[Paper]) -> TagGraph {
    let groups = feedstock_groups(papers);
    if groups.is_empty() {
        return TagGraph::default();
    }

    let mut links = Vec::new();
    for i in 0..papers.len() {
        for j in (i + 1)..papers.len() {
            let weight = shared_tag_count(&papers[i].tags, &papers[j].tags);
            if weight > SHARED_TAG_THRESHOLD {
                links.push((i, j, weight));
            }
        }
    }

    let mut linked = vec![false; papers.len()];
    for &(i, j, _) in &links {
        linked[i] = true;
        linked[j] = true;
    }

    let mut node_by_paper = vec![usize::MAX; papers.len()];
    let mut nodes = Vec::new();
    let mut index_by_id = HashMap::new();
    for (paper_index, paper) in papers.iter().enumerate() {
        if !linked[paper_index] {
            continue;
        }

        node_by_paper[paper_index] = nodes.len();
        index_by_id.insert(paper.id.clone(), nodes.len());
        nodes.push(GraphNode {
            paper: paper_index,
            id: paper.id.clone(),
            feedstock_group: feedstock_group(paper, &groups),
        });
    }

    let edges = links
        .into_iter()
        .map(|(i, j, weight)| GraphEdge {
            source: node_by_paper[i],
            target: node_by_paper[j],
            weight,
        })
        .collect();

    TagGraph {
        nodes,
        edges,
        index_by_id,
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::papers::record::Metrics;

    pub(crate) fn paper(id: &str, tags: &[&str], feedstock: &[&str]) -> Paper {
        Paper {
            id: id.to_owned(),
            title: format!("Paper {id}"),
            doi: format!("https://doi.org/10.0/{id}"),
            tags: tags.iter().map(|tag| (*tag).to_owned()).collect(),
            feedstock_tags: feedstock.iter().map(|tag| (*tag).to_owned()).collect(),
            output_products_tags: vec!["ethanol".to_owned()],
            novelty: String::new(),
            irr_summary: String::new(),
            price_sensitivity: String::new(),
            metrics: Metrics::default(),
            citation_count: None,
            metadata: None,
        }
    }

    #[test]
    fn four_shared_tags_make_no_edge() {
        let papers = [
            paper("a", &["a", "b", "c", "d", "e"], &["corn"]),
            paper("b", &["a", "b", "c", "d", "f"], &["corn"]),
        ];
        let graph = build_graph(&papers);
        assert!(graph.edges.is_empty());
        assert!(graph.nodes.is_empty());
    }

    #[test]
    fn five_shared_tags_make_weighted_edge() {
        let papers = [
            paper("a", &["a", "b", "c", "d", "e"], &["corn"]),
            paper("b", &["a", "b", "c", "d", "e", "f"], &["cane"]),
        ];
        let graph = build_graph(&papers);
        assert_eq!(
            graph.edges,
            vec![GraphEdge {
                source: 0,
                target: 1,
                weight: 5
            }]
        );
        assert_eq!(graph.node_index("b"), Some(1));
    }

    #[test]
    fn empty_inputs_make_empty_graph() {
        let graph = build_graph(&[]);
        assert!(graph.nodes.is_empty() && graph.edges.is_empty());

        let tags = ["a", "b", "c", "d", "e"];
        let no_feedstock = [paper("a", &tags, &[]), paper("b", &tags, &[])];
        assert!(build_graph(&no_feedstock).is_empty());
    }

    #[test]
    fn edges_match_pairwise_threshold_exactly() {
        let pool = ["t0", "t1", "t2", "t3", "t4", "t5", "t6", "t7", "t8"];
        let papers = (0..9)
            .map(|i| {
                let tags = pool
                    .iter()
                    .enumerate()
                    .filter(|(k, _)| (k * 7 + i * 3) % 9 < 6)
                    .map(|(_, tag)| *tag)
                    .collect::<Vec<_>>();
                paper(&format!("p{i}"), &tags, &["corn"])
            })
            .collect::<Vec<_>>();

        let graph = build_graph(&papers);
        for edge in &graph.edges {
            let a = &papers[graph.nodes[edge.source].paper];
            let b = &papers[graph.nodes[edge.target].paper];
            assert_eq!(shared_tag_count(&a.tags, &b.tags), edge.weight);
            assert!(edge.weight > SHARED_TAG_THRESHOLD);
        }

        for i in 0..papers.len() {
            for j in (i + 1)..papers.len() {
                if shared_tag_count(&papers[i].tags, &papers[j].tags) <= SHARED_TAG_THRESHOLD {
                    continue;
                }
                let (Some(a), Some(b)) =
                    (graph.node_index(&papers[i].id), graph.node_index(&papers[j].id))
                else {
                    panic!("linked papers {i} and {j} are missing from the node set");
                };
                assert!(graph.edges.iter().any(|edge| edge.source == a && edge.target == b));
            }
        }
    }

    #[test]
    fn isolated_papers_are_not_nodes() {
        let shared = ["a", "b", "c", "d", "e"];
        let papers = [
            paper("x", &shared, &["corn"]),
            paper("lonely", &["z"], &["corn"]),
            paper("y", &shared, &["corn"]),
        ];
        let graph = build_graph(&papers);
        let ids = graph.nodes.iter().map(|node| node.id.as_str()).collect::<Vec<_>>();
        assert_eq!(ids, vec!["x", "y"]);
        assert_eq!(graph.nodes[1].paper, 2);
        assert_eq!(graph.node_index("lonely"), None);
    }

    #[test]
    fn feedstock_groups_follow_first_seen_order() {
        let shared = ["a", "b", "c", "d", "e"];
        let papers = [
            paper("lonely", &[], &["sugarcane", "corn"]),
            paper("x", &shared, &["corn", "switchgrass"]),
            paper("y", &shared, &["switchgrass"]),
            paper("z", &shared, &[]),
        ];

        let groups = feedstock_groups(&papers);
        assert_eq!(groups["sugarcane"], 1);
        assert_eq!(groups["corn"], 2);
        assert_eq!(groups["switchgrass"], 3);

        let first = build_graph(&papers);
        let second = build_graph(&papers);
        let groups_of = |graph: &TagGraph| {
            graph
                .nodes
                .iter()
                .map(|node| node.feedstock_group)
                .collect::<Vec<_>>()
        };
        assert_eq!(groups_of(&first), vec![2, 3, 0]);
        assert_eq!(groups_of(&first), groups_of(&second));
        assert_eq!(first.nodes[1].palette_index(), 3);
    }
}
