//! Random Forest Classifier
//!
//! Bagged CART trees grown on gini impurity. Each tree sees a bootstrap sample
//! and considers a random subset of features at every split; prediction
//! averages the leaf class distributions of all trees.

use crate::InferenceError;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Largest class count accepted from a decoded forest
pub const MAX_CLASSES: usize = 1024;

/// Forest training parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ForestParams {
    /// Number of trees
    pub n_trees: usize,
    /// Maximum tree depth
    pub max_depth: usize,
    /// Minimum samples required to split a node
    pub min_samples_split: usize,
    /// Features considered per split (default: √n_features)
    pub max_features: Option<usize>,
    /// Weight classes inversely to their frequency
    pub balanced: bool,
    /// RNG seed for bootstrap and feature sampling
    pub seed: u64,
}

impl Default for ForestParams {
    fn default() -> Self {
        Self {
            n_trees: 300,
            max_depth: 12,
            min_samples_split: 2,
            max_features: None,
            balanced: true,
            seed: 42,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
enum Node {
    Leaf {
        distribution: Vec<f64>,
    },
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
}

/// Single decision tree, root at index 0
#[derive(Debug, Clone, Serialize, Deserialize)]
struct DecisionTree {
    nodes: Vec<Node>,
}

impl DecisionTree {
    fn leaf_distribution(&self, row: &[f64]) -> &[f64] {
        let mut idx = 0;
        loop {
            match &self.nodes[idx] {
                Node::Leaf { distribution } => return distribution,
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    idx = if row[*feature] <= *threshold { *left } else { *right };
                }
            }
        }
    }
}

/// Trained random forest
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RandomForest {
    n_features: usize,
    n_classes: usize,
    trees: Vec<DecisionTree>,
}

impl RandomForest {
    /// Fit a forest on rows `x` with class indices `y` in `0..n_classes`
    pub fn fit(
        x: &[Vec<f64>],
        y: &[usize],
        n_classes: usize,
        params: &ForestParams,
    ) -> Result<Self, InferenceError> {
        let n_samples = x.len();
        if n_samples == 0 {
            return Err(InferenceError::TrainingFailed("no training samples".to_string()));
        }
        if y.len() != n_samples {
            return Err(InferenceError::TrainingFailed(format!(
                "{} rows but {} labels",
                n_samples,
                y.len()
            )));
        }
        let n_features = x[0].len();
        if n_features == 0 || x.iter().any(|row| row.len() != n_features) {
            return Err(InferenceError::TrainingFailed(
                "rows must share a non-zero feature count".to_string(),
            ));
        }
        if let Some(bad) = y.iter().find(|&&label| label >= n_classes) {
            return Err(InferenceError::TrainingFailed(format!(
                "label {} outside 0..{}",
                bad, n_classes
            )));
        }
        if params.n_trees == 0 {
            return Err(InferenceError::TrainingFailed("n_trees must be positive".to_string()));
        }

        let weights = sample_weights(y, n_classes, params.balanced);
        let max_features = params
            .max_features
            .unwrap_or_else(|| (n_features as f64).sqrt() as usize)
            .clamp(1, n_features);

        info!(
            "Fitting random forest: {} trees, depth {}, {} samples x {} features, {} classes",
            params.n_trees, params.max_depth, n_samples, n_features, n_classes
        );

        let mut rng = StdRng::seed_from_u64(params.seed);
        let mut trees = Vec::with_capacity(params.n_trees);
        for _ in 0..params.n_trees {
            let bootstrap: Vec<usize> = (0..n_samples).map(|_| rng.gen_range(0..n_samples)).collect();
            let mut builder = TreeBuilder {
                x,
                y,
                weights: &weights,
                n_classes,
                max_depth: params.max_depth,
                min_samples_split: params.min_samples_split.max(2),
                max_features,
                nodes: Vec::new(),
            };
            builder.grow(bootstrap, 0, &mut rng);
            trees.push(DecisionTree {
                nodes: builder.nodes,
            });
        }

        debug!(
            "Forest built, {} nodes total",
            trees.iter().map(|t| t.nodes.len()).sum::<usize>()
        );

        Ok(Self {
            n_features,
            n_classes,
            trees,
        })
    }

    /// Averaged class probabilities for one row
    pub fn predict_proba(&self, row: &[f64]) -> Result<Vec<f64>, InferenceError> {
        if row.len() != self.n_features {
            return Err(InferenceError::InvalidInputShape {
                expected: self.n_features,
                actual: row.len(),
            });
        }

        let mut probabilities = vec![0.0; self.n_classes];
        for tree in &self.trees {
            for (total, p) in probabilities.iter_mut().zip(tree.leaf_distribution(row)) {
                *total += p;
            }
        }
        let n_trees = self.trees.len().max(1) as f64;
        probabilities.iter_mut().for_each(|p| *p /= n_trees);
        Ok(probabilities)
    }

    /// Most probable class for one row
    pub fn predict(&self, row: &[f64]) -> Result<usize, InferenceError> {
        let probabilities = self.predict_proba(row)?;
        Ok(argmax(&probabilities))
    }

    /// Check the structure of a forest that did not come from [`RandomForest::fit`].
    ///
    /// Every tree must be non-empty, split children must point forward and
    /// stay inside the tree, split features must exist, and every leaf must
    /// carry one finite probability per class.
    pub fn validate(&self) -> Result<(), InferenceError> {
        let corrupt = |message: String| Err(InferenceError::Codec(format!("corrupt forest: {}", message)));

        if self.n_features == 0 {
            return corrupt("no features".to_string());
        }
        if self.n_classes == 0 || self.n_classes > MAX_CLASSES {
            return corrupt(format!("{} classes outside 1..={}", self.n_classes, MAX_CLASSES));
        }
        if self.trees.is_empty() {
            return corrupt("no trees".to_string());
        }

        for (t, tree) in self.trees.iter().enumerate() {
            let len = tree.nodes.len();
            if len == 0 {
                return corrupt(format!("tree {} is empty", t));
            }
            for (idx, node) in tree.nodes.iter().enumerate() {
                match node {
                    Node::Leaf { distribution } => {
                        if distribution.len() != self.n_classes || distribution.iter().any(|p| !p.is_finite()) {
                            return corrupt(format!("tree {} node {}: bad leaf distribution", t, idx));
                        }
                    }
                    Node::Split {
                        feature,
                        left,
                        right,
                        ..
                    } => {
                        if *feature >= self.n_features {
                            return corrupt(format!("tree {} node {}: feature {} out of range", t, idx, feature));
                        }
                        if [*left, *right].iter().any(|&child| child <= idx || child >= len) {
                            return corrupt(format!(
                                "tree {} node {}: children {}/{} outside {}..{}",
                                t,
                                idx,
                                left,
                                right,
                                idx + 1,
                                len
                            ));
                        }
                    }
                }
            }
        }
        Ok(())
    }

    /// Number of input features
    pub fn n_features(&self) -> usize {
        self.n_features
    }

    /// Number of classes
    pub fn n_classes(&self) -> usize {
        self.n_classes
    }

    /// Number of trees
    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }
}

struct TreeBuilder<'a> {
    x: &'a [Vec<f64>],
    y: &'a [usize],
    weights: &'a [f64],
    n_classes: usize,
    max_depth: usize,
    min_samples_split: usize,
    max_features: usize,
    nodes: Vec<Node>,
}

impl TreeBuilder<'_> {
    /// Grow a subtree over `indices` and return its node id
    fn grow(&mut self, indices: Vec<usize>, depth: usize, rng: &mut StdRng) -> usize {
        let counts = self.class_weights(&indices);
        let node_id = self.nodes.len();

        let pure = counts.iter().filter(|&&w| w > 0.0).count() <= 1;
        let split = if depth >= self.max_depth || indices.len() < self.min_samples_split || pure {
            None
        } else {
            self.best_split(&indices, &counts, rng)
        };

        let Some((feature, threshold)) = split else {
            self.nodes.push(Node::Leaf {
                distribution: normalize(counts),
            });
            return node_id;
        };

        // Placeholder until both children exist.
        self.nodes.push(Node::Leaf {
            distribution: Vec::new(),
        });

        let x = self.x;
        let (left_idx, right_idx): (Vec<usize>, Vec<usize>) =
            indices.into_iter().partition(|&i| x[i][feature] <= threshold);
        let left = self.grow(left_idx, depth + 1, rng);
        let right = self.grow(right_idx, depth + 1, rng);

        self.nodes[node_id] = Node::Split {
            feature,
            threshold,
            left,
            right,
        };
        node_id
    }

    fn class_weights(&self, indices: &[usize]) -> Vec<f64> {
        let mut counts = vec![0.0; self.n_classes];
        for &i in indices {
            counts[self.y[i]] += self.weights[i];
        }
        counts
    }

    fn best_split(&self, indices: &[usize], parent: &[f64], rng: &mut StdRng) -> Option<(usize, f64)> {
        let n_features = self.x[0].len();
        let parent_total: f64 = parent.iter().sum();
        if parent_total <= 0.0 {
            return None;
        }
        let parent_impurity = gini(parent, parent_total);

        let mut best: Option<(usize, f64, f64)> = None;
        for feature in rand::seq::index::sample(rng, n_features, self.max_features).iter() {
            let mut order = indices.to_vec();
            order.sort_by(|&a, &b| self.x[a][feature].total_cmp(&self.x[b][feature]));

            let mut left = vec![0.0; self.n_classes];
            let mut right = parent.to_vec();
            let mut left_total = 0.0;

            for pair in order.windows(2) {
                let (i, next) = (pair[0], pair[1]);
                let w = self.weights[i];
                left[self.y[i]] += w;
                right[self.y[i]] -= w;
                left_total += w;

                let current_value = self.x[i][feature];
                let next_value = self.x[next][feature];
                if next_value <= current_value {
                    continue;
                }

                let right_total = parent_total - left_total;
                let impurity = (left_total * gini(&left, left_total)
                    + right_total * gini(&right, right_total))
                    / parent_total;

                if best.map_or(true, |(_, _, b)| impurity < b) {
                    best = Some((feature, (current_value + next_value) / 2.0, impurity));
                }
            }
        }

        best.filter(|&(_, _, impurity)| impurity < parent_impurity - 1e-12)
            .map(|(feature, threshold, _)| (feature, threshold))
    }
}

fn sample_weights(y: &[usize], n_classes: usize, balanced: bool) -> Vec<f64> {
    if !balanced {
        return vec![1.0; y.len()];
    }

    let mut counts = vec![0usize; n_classes];
    for &label in y {
        counts[label] += 1;
    }
    let present = counts.iter().filter(|&&c| c > 0).count().max(1);
    let class_weight: Vec<f64> = counts
        .iter()
        .map(|&c| {
            if c == 0 {
                0.0
            } else {
                y.len() as f64 / (present as f64 * c as f64)
            }
        })
        .collect();

    y.iter().map(|&label| class_weight[label]).collect()
}

fn gini(counts: &[f64], total: f64) -> f64 {
    if total <= 0.0 {
        return 0.0;
    }
    1.0 - counts.iter().map(|c| (c / total).powi(2)).sum::<f64>()
}

fn normalize(counts: Vec<f64>) -> Vec<f64> {
    let total: f64 = counts.iter().sum();
    if total <= 0.0 {
        let n = counts.len().max(1) as f64;
        return vec![1.0 / n; counts.len()];
    }
    counts.into_iter().map(|c| c / total).collect()
}

fn argmax(values: &[f64]) -> usize {
    values
        .iter()
        .enumerate()
        .fold((0, f64::NEG_INFINITY), |(best_idx, best), (idx, &v)| {
            if v > best {
                (idx, v)
            } else {
                (best_idx, best)
            }
        })
        .0
}
