//! MST partitioner.
//!
//! Strokes that belong to one symbol are drawn close together, so candidate
//! symbols are the connected stroke sets of the minimum spanning tree over
//! stroke centers of mass. Every candidate is classified and the set of
//! disjoint candidates covering all strokes with the highest total
//! confidence wins.

use log::{debug, info, warn};

use crate::classifier::{Classification, Classifier, classify_or_minimum};
use crate::config::{DiagnosticsConfig, EngineConfig, PartitionerConfig};
use crate::error::Result;
use crate::geometry::{Trace, TraceGroup};
use crate::graph::{find_unique_paths, graph_from_predicate, kruskal};
use crate::graph::mst::{upper_triangular_len, upper_triangular_to_vector_index};
use crate::partitioner::{Partitioner, atomic, validate};
use crate::symbols::{Label, Symbol, factory};

pub struct MstPartitioner<C> {
    classifier: C,
    config: PartitionerConfig,
    diagnostics: DiagnosticsConfig,
}

impl<C: Classifier> MstPartitioner<C> {
    pub fn new(classifier: C, config: &EngineConfig) -> Self {
        let mut partitioner = Self {
            classifier,
            config: config.partitioner.clone(),
            diagnostics: config.diagnostics.clone(),
        };
        partitioner.set_max_traces_in_symbol(config.partitioner.max_traces_in_symbol);
        partitioner
    }

    pub fn classifier(&self) -> &C {
        &self.classifier
    }

    pub fn config(&self) -> &PartitionerConfig {
        &self.config
    }

    /// Largest number of strokes one symbol may span; at least 1.
    pub fn set_max_traces_in_symbol(&mut self, max: usize) {
        self.config.max_traces_in_symbol = max.max(1);
    }

    /// Dots skip the classifier; everything else goes through it.
    fn classify(&self, group: &TraceGroup) -> Classification {
        if group.len() == 1 && group.traces()[0].is_dot() {
            return Classification::new(Label::Dot, self.config.dot_confidence);
        }
        classify_or_minimum(&self.classifier, group)
    }

    fn symbol(&self, group: &TraceGroup) -> Symbol {
        let c = self.classify(group);
        factory::create(c.label, group, c.confidence)
    }

    /// One symbol per stroke.
    fn singletons(&self, expression: &TraceGroup) -> Vec<Symbol> {
        expression
            .iter()
            .map(|t| self.symbol(&TraceGroup::new().with(t.clone())))
            .collect()
    }

    /// Candidate stroke sets: connected in the MST, no dot inside a larger
    /// set, no atomic pair split.
    fn candidate_paths(&self, expression: &TraceGroup) -> Vec<Vec<usize>> {
        let traces = expression.traces();
        let n = traces.len();

        let mut weights = vec![0.0; upper_triangular_len(n)];
        for i in 0..n {
            for j in i + 1..n {
                weights[upper_triangular_to_vector_index(n, i, j)] = traces[i]
                    .center_of_mass()
                    .distance(&traces[j].center_of_mass());
            }
        }
        let tree = kruskal(n, &weights);
        let paths = find_unique_paths(&tree.to_graph(), self.config.max_traces_in_symbol, &[]);

        let dots: Vec<bool> = traces.iter().map(Trace::is_dot).collect();
        let mut pairs = atomic::overlap_pairs(expression, &self.config.overlap);
        pairs.extend(atomic::equals_pairs(expression, &self.classifier, &self.config));
        if self.diagnostics.verbose {
            debug!("atomic stroke pairs: {pairs:?}");
        }

        paths
            .into_iter()
            .filter(|p| p.len() == 1 || !p.iter().any(|&i| dots[i]))
            .filter(|p| !atomic::splits_pair(p, &pairs))
            .collect()
    }
}

/// Number of times each stroke is used by the paths `chosen` indexes into.
fn stroke_counts(chosen: &[usize], paths: &[Vec<usize>], strokes: usize) -> Vec<usize> {
    let mut counts = vec![0; strokes];
    for &p in chosen {
        for &s in &paths[p] {
            counts[s] += 1;
        }
    }
    counts
}

impl<C: Classifier> Partitioner for MstPartitioner<C> {
    fn partition(&self, expression: &TraceGroup) -> Result<Vec<Symbol>> {
        validate(expression)?;
        let n = expression.len();
        match n {
            0 => return Ok(Vec::new()),
            1 => return Ok(vec![self.symbol(expression)]),
            _ => {}
        }

        let paths = self.candidate_paths(expression);
        let scores: Vec<Classification> = paths
            .iter()
            .map(|p| self.classify(&expression.sub_group(p)))
            .collect();
        if self.diagnostics.verbose {
            for (p, c) in paths.iter().zip(&scores) {
                debug!("path {p:?}: {} ({:.3})", c.label, c.confidence);
            }
        }

        let combinable = graph_from_predicate(paths.len(), |a, b| {
            !paths[a].iter().any(|s| paths[b].contains(s))
        });
        let no_repeat =
            |chosen: &[usize]| stroke_counts(chosen, &paths, n).iter().all(|&c| c <= 1);
        let partitions = find_unique_paths(&combinable, paths.len(), &[&no_repeat]);

        let mut best: Option<(&Vec<usize>, f64)> = None;
        for partition in &partitions {
            if !stroke_counts(partition, &paths, n).iter().all(|&c| c == 1) {
                continue;
            }
            let score: f64 = partition.iter().map(|&p| scores[p].confidence).sum();
            if self.diagnostics.verbose {
                debug!("partition {partition:?}: {score:.3}");
            }
            if best.is_none_or(|(_, s)| score > s) {
                best = Some((partition, score));
            }
        }

        let Some((partition, score)) = best else {
            warn!("no partition covers all {n} strokes; using one symbol per stroke");
            return Ok(self.singletons(expression));
        };
        info!(
            "partitioned {n} strokes into {} symbols (score {score:.3})",
            partition.len()
        );
        Ok(partition
            .iter()
            .map(|&p| {
                let c = scores[p];
                factory::create(c.label, &expression.sub_group(&paths[p]), c.confidence)
            })
            .collect())
    }

    /// A new stroke joins the first symbol it touches, or a flat symbol it
    /// turns into `=`. Leftover strokes are partitioned on their own.
    fn append(&self, mut symbols: Vec<Symbol>, strokes: &TraceGroup) -> Result<Vec<Symbol>> {
        if symbols.is_empty() {
            return self.partition(strokes);
        }
        if strokes.is_empty() {
            return Ok(symbols);
        }
        validate(strokes)?;

        let mut changed = vec![false; symbols.len()];
        let mut free = TraceGroup::new();
        for trace in strokes {
            let target = symbols.iter().position(|s| {
                if s.group().is_overlapped_by(trace, &self.config.overlap) {
                    return true;
                }
                let flat = matches!(
                    s.label(),
                    Label::Minus | Label::HorizontalLine | Label::FractionLine
                ) && !s.has_children();
                if !flat || s.group().width() < self.config.append_width_ratio * trace.width() {
                    return false;
                }
                let combined = s.group().clone().with(trace.clone());
                self.classify(&combined).label == Label::Equals
            });
            match target {
                Some(j) => {
                    symbols[j].group_mut().add(trace.clone());
                    changed[j] = true;
                }
                None => {
                    free.add(trace.clone());
                }
            }
        }

        for (symbol, _) in symbols.iter_mut().zip(&changed).filter(|(_, c)| **c) {
            let c = self.classify(symbol.group());
            symbol.reclassify(c.label, c.confidence);
        }
        if self.diagnostics.verbose {
            debug!(
                "append: {} stroke(s) merged, {} left to partition",
                strokes.len() - free.len(),
                free.len()
            );
        }

        symbols.extend(self.partition(&free)?);
        for symbol in &mut symbols {
            symbol.reset();
        }
        Ok(symbols)
    }

    fn remove(&self, mut symbols: Vec<Symbol>, strokes: &TraceGroup) -> Vec<Symbol> {
        for symbol in &mut symbols {
            symbol.reset();
        }
        let mut changed = vec![false; symbols.len()];
        for trace in strokes {
            if let Some(j) = symbols.iter_mut().position(|s| s.group_mut().remove(trace)) {
                changed[j] = true;
            }
        }
        symbols
            .into_iter()
            .zip(changed)
            .filter(|(s, _)| !s.group().is_empty())
            .map(|(mut s, changed)| {
                if changed {
                    let c = self.classify(s.group());
                    s.reclassify(c.label, c.confidence);
                }
                s
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::AnnotatedClassifier;
    use crate::config::OverlapConfig;
    use crate::symbols::Class;

    fn vertical(x: f64, y0: f64, y1: f64) -> Trace {
        Trace::from(vec![(x, y0), (x, (y0 + y1) / 2.0), (x, y1)])
    }

    fn horizontal(x0: f64, x1: f64, y: f64) -> Trace {
        Trace::from(vec![(x0, y), ((x0 + x1) / 2.0, y), (x1, y)])
    }

    fn partitioner(classifier: AnnotatedClassifier) -> MstPartitioner<AnnotatedClassifier> {
        MstPartitioner::new(classifier, &EngineConfig::default())
    }

    fn covers_each_stroke_once(symbols: &[Symbol], ink: &TraceGroup) -> bool {
        ink.iter().all(|t| {
            symbols
                .iter()
                .filter(|s| s.group().contains(t))
                .count()
                == 1
        })
    }

    // ── partition ───────────────────────────────────────────────────────

    #[test]
    fn test_empty_expression() {
        let p = partitioner(AnnotatedClassifier::new());
        assert!(p.partition(&TraceGroup::new()).unwrap().is_empty());
    }

    #[test]
    fn test_single_dot_bypasses_classifier() {
        let p = partitioner(AnnotatedClassifier::new());
        let ink = TraceGroup::new().with(Trace::from(vec![(3.0, 4.0)]));
        let symbols = p.partition(&ink).unwrap();
        assert_eq!(symbols.len(), 1);
        assert_eq!(symbols[0].label(), Label::Dot);
        assert_eq!(symbols[0].confidence(), 1.0);
    }

    #[test]
    fn test_three_strokes_make_one() {
        // Three short collinear pieces of one vertical stroke.
        let ink = TraceGroup::new()
            .with(vertical(0.0, 0.0, 10.0))
            .with(vertical(0.0, 14.0, 24.0))
            .with(vertical(0.0, 28.0, 38.0));
        let p = partitioner(AnnotatedClassifier::new().with(Label::One, ink.clone()));
        let symbols = p.partition(&ink).unwrap();
        assert_eq!(symbols.len(), 1);
        assert_eq!(symbols[0].label(), Label::One);
        assert!(symbols[0].confidence() > crate::classifier::MIN_CONFIDENCE);
    }

    #[test]
    fn test_partition_covers_every_stroke_once() {
        let plus = TraceGroup::new()
            .with(horizontal(0.0, 20.0, 10.0))
            .with(vertical(10.0, 0.0, 20.0));
        let two = TraceGroup::new().with(Trace::from(vec![
            (30.0, 15.0),
            (40.0, 20.0),
            (30.0, 0.0),
            (40.0, 0.0),
        ]));
        let dot = TraceGroup::new().with(Trace::from(vec![(45.0, 0.0)]));
        let mut ink = plus.clone();
        ink.extend(&two).extend(&dot);
        let classifier = AnnotatedClassifier::new()
            .with(Label::Plus, plus)
            .with(Label::Two, two);
        let symbols = partitioner(classifier).partition(&ink).unwrap();
        assert!(covers_each_stroke_once(&symbols, &ink));
        let labels: Vec<Label> = symbols.iter().map(Symbol::label).collect();
        assert!(labels.contains(&Label::Plus));
        assert!(labels.contains(&Label::Two));
        assert!(labels.contains(&Label::Dot));
    }

    #[test]
    fn test_partitions_are_valid_across_inputs() {
        // Touching strokes the classifier prefers apart, plus a 2 and a dot.
        let bar = horizontal(0.0, 20.0, 10.0);
        let stem = vertical(10.0, 0.0, 20.0);
        let two = Trace::from(vec![(30.0, 15.0), (40.0, 20.0), (30.0, 0.0), (40.0, 0.0)]);
        let cross = (
            TraceGroup::new()
                .with(bar.clone())
                .with(stem.clone())
                .with(two.clone())
                .with(Trace::from(vec![(45.0, 0.0)])),
            AnnotatedClassifier::new()
                .with(Label::Minus, TraceGroup::new().with(bar))
                .with(Label::One, TraceGroup::new().with(stem))
                .with(Label::Two, TraceGroup::new().with(two)),
        );

        // Equals bars that score higher as two minus signs.
        let one = vertical(-20.0, 0.0, 30.0);
        let top = horizontal(60.0, 100.0, 20.0);
        let bottom = horizontal(61.0, 99.0, 8.0);
        let equals = (
            TraceGroup::new()
                .with(one.clone())
                .with(top.clone())
                .with(bottom.clone()),
            AnnotatedClassifier::new()
                .with(Label::One, TraceGroup::new().with(one))
                .with(Label::Minus, TraceGroup::new().with(top.clone()))
                .with(Label::Minus, TraceGroup::new().with(bottom.clone()))
                .with(Label::Equals, TraceGroup::new().with(top).with(bottom)),
        );

        // One symbol drawn in more pieces than the cap allows.
        let pieces: TraceGroup = (0..4)
            .map(|k| vertical(0.0, 14.0 * k as f64, 14.0 * k as f64 + 10.0))
            .collect();
        let long = (pieces.clone(), AnnotatedClassifier::new().with(Label::One, pieces));

        for cap in [2, 3] {
            for (ink, classifier) in [&cross, &equals, &long] {
                let mut p = MstPartitioner::new(classifier, &EngineConfig::default());
                p.set_max_traces_in_symbol(cap);
                let symbols = p.partition(ink).unwrap();

                assert!(covers_each_stroke_once(&symbols, ink));
                assert!(symbols.iter().all(|s| s.group().len() <= cap));

                let mut pairs = atomic::overlap_pairs(ink, &p.config().overlap);
                pairs.extend(atomic::equals_pairs(ink, classifier, p.config()));
                for (i, j) in pairs {
                    let (a, b) = (&ink.traces()[i], &ink.traces()[j]);
                    assert!(
                        symbols
                            .iter()
                            .all(|s| s.group().contains(a) == s.group().contains(b)),
                        "strokes {i} and {j} split with cap {cap}"
                    );
                }
            }
        }
        // The atomic pairs above were really exercised.
        assert_eq!(atomic::overlap_pairs(&cross.0, &OverlapConfig::default()), vec![(0, 1)]);
        assert_eq!(
            atomic::equals_pairs(&equals.0, &equals.1, &PartitionerConfig::default()),
            vec![(1, 2)]
        );
    }

    #[test]
    fn test_dot_is_never_merged() {
        // The classifier would like the dot and the stroke as one symbol.
        let stroke = vertical(0.0, 0.0, 20.0);
        let dot = Trace::from(vec![(0.0, 26.0)]);
        let ink = TraceGroup::new().with(stroke).with(dot);
        let p = partitioner(AnnotatedClassifier::new().with(Label::LowerI, ink.clone()));
        let symbols = p.partition(&ink).unwrap();
        assert_eq!(symbols.len(), 2);
        assert!(symbols.iter().all(|s| s.group().len() == 1));
    }

    #[test]
    fn test_overlapping_strokes_stay_together() {
        // A cross the classifier scores higher as two separate strokes.
        let a = horizontal(0.0, 20.0, 10.0);
        let b = vertical(10.0, 0.0, 20.0);
        let ink = TraceGroup::new().with(a.clone()).with(b.clone());
        let classifier = AnnotatedClassifier::new()
            .with(Label::Minus, TraceGroup::new().with(a))
            .with(Label::One, TraceGroup::new().with(b));
        let symbols = partitioner(classifier).partition(&ink).unwrap();
        assert_eq!(symbols.len(), 1);
        assert_eq!(symbols[0].group().len(), 2);
    }

    #[test]
    fn test_no_eligible_partition_falls_back() {
        // Two overlapping strokes with a one-stroke limit.
        let ink = TraceGroup::new()
            .with(horizontal(0.0, 20.0, 10.0))
            .with(vertical(10.0, 0.0, 20.0));
        let mut p = partitioner(AnnotatedClassifier::new().with(Label::Plus, ink.clone()));
        p.set_max_traces_in_symbol(1);
        let symbols = p.partition(&ink).unwrap();
        assert_eq!(symbols.len(), 2);
        assert!(covers_each_stroke_once(&symbols, &ink));
    }

    #[test]
    fn test_invalid_stroke_rejected() {
        let p = partitioner(AnnotatedClassifier::new());
        let ink = TraceGroup::new().with(Trace::new());
        assert!(p.partition(&ink).is_err());
    }

    // ── append ──────────────────────────────────────────────────────────

    #[test]
    fn test_append_overlapping_stroke_joins_symbol() {
        let bar = horizontal(0.0, 20.0, 10.0);
        let stem = vertical(10.0, 0.0, 20.0);
        let classifier = AnnotatedClassifier::new()
            .with(Label::Plus, TraceGroup::new().with(bar.clone()).with(stem.clone()));
        let p = partitioner(classifier);
        let symbols = p.partition(&TraceGroup::new().with(bar)).unwrap();
        let symbols = p.append(symbols, &TraceGroup::new().with(stem)).unwrap();
        assert_eq!(symbols.len(), 1);
        assert_eq!(symbols[0].label(), Label::Plus);
        assert_eq!(symbols[0].confidence(), 1.0);
    }

    #[test]
    fn test_append_second_bar_makes_equals() {
        let top = horizontal(0.0, 40.0, 20.0);
        let bottom = horizontal(1.0, 39.0, 8.0);
        let classifier = AnnotatedClassifier::new().with(
            Label::Equals,
            TraceGroup::new().with(top.clone()).with(bottom.clone()),
        );
        let p = partitioner(classifier);
        let symbols = p.partition(&TraceGroup::new().with(top)).unwrap();
        // As the recognizer would hold it before the second bar arrives.
        let symbols = symbols
            .into_iter()
            .map(|s| factory::create(Label::HorizontalLine, s.group(), s.confidence()))
            .collect();
        let symbols = p.append(symbols, &TraceGroup::new().with(bottom)).unwrap();
        assert_eq!(symbols.len(), 1);
        assert_eq!(symbols[0].label(), Label::Equals);
    }

    #[test]
    fn test_append_far_stroke_is_partitioned_separately() {
        let one = vertical(0.0, 0.0, 20.0);
        let two = vertical(50.0, 0.0, 20.0);
        let classifier = AnnotatedClassifier::new()
            .with(Label::One, TraceGroup::new().with(one.clone()))
            .with(Label::Seven, TraceGroup::new().with(two.clone()));
        let p = partitioner(classifier);
        let symbols = p.partition(&TraceGroup::new().with(one)).unwrap();
        let symbols = p.append(symbols, &TraceGroup::new().with(two)).unwrap();
        let labels: Vec<Label> = symbols.iter().map(Symbol::label).collect();
        assert_eq!(labels, vec![Label::One, Label::Seven]);
    }

    #[test]
    fn test_append_to_nothing_partitions() {
        let one = vertical(0.0, 0.0, 20.0);
        let p = partitioner(
            AnnotatedClassifier::new().with(Label::One, TraceGroup::new().with(one.clone())),
        );
        let symbols = p.append(Vec::new(), &TraceGroup::new().with(one)).unwrap();
        assert_eq!(symbols.len(), 1);
    }

    // ── remove ──────────────────────────────────────────────────────────

    #[test]
    fn test_remove_reclassifies_and_drops_empty() {
        let bar = horizontal(0.0, 20.0, 10.0);
        let stem = vertical(10.0, 0.0, 20.0);
        let far = vertical(60.0, 0.0, 20.0);
        let classifier = AnnotatedClassifier::new()
            .with(Label::Minus, TraceGroup::new().with(bar.clone()))
            .with(Label::One, TraceGroup::new().with(far.clone()));
        let p = partitioner(classifier);
        let symbols = vec![
            factory::create(
                Label::Plus,
                &TraceGroup::new().with(bar.clone()).with(stem.clone()),
                1.0,
            ),
            factory::create(Label::One, &TraceGroup::new().with(far.clone()), 1.0),
        ];
        let symbols = p.remove(symbols, &TraceGroup::new().with(stem));
        assert_eq!(symbols.len(), 2);
        assert_eq!(symbols[0].label(), Label::Minus);

        let symbols = p.remove(symbols, &TraceGroup::new().with(far));
        assert_eq!(symbols.len(), 1);
        assert_eq!(symbols[0].class(), Class::Operator);
    }
}
