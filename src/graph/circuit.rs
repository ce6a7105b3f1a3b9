use super::closure::{dependency_closure, SignalGraph};
use super::error::SimError;
use super::eval::{EvalContext, Evaluator};
use super::handles::*;
use super::node::*;
use crate::data_structures::{Immutable, State};
use indexmap::IndexSet;
use std::collections::{BTreeMap, HashMap};
#[cfg(feature = "debug_signals")]
use std::collections::HashSet;
use std::path::Path;

/// Value history of every signal that took part in a simulation, sorted by name.
pub type Histories = BTreeMap<String, Vec<i64>>;

/// Initialized version of [`CircuitBuilder`]. See [`CircuitBuilder`] for documentation.
///
/// The circuit is the sole owner of the committed values of its signals, they can only be
/// changed by simulating it or through [Circuit::set_value].
///
/// [`CircuitBuilder`]: super::CircuitBuilder
#[derive(Debug, Clone)]
pub struct Circuit {
    pub(super) nodes: Immutable<Vec<ExprNode>>,
    pub(super) signals: Immutable<Vec<Signal>>,
    pub(super) names: Immutable<HashMap<String, SignalIndex>>,
    pub(super) state: State,
    #[cfg(feature = "debug_signals")]
    pub(super) probes: Immutable<HashSet<SignalIndex>>,
}

impl Circuit {
    pub(super) fn evaluator(&self) -> Evaluator<'_> {
        Evaluator {
            nodes: &self.nodes,
            signals: &self.signals,
            state: &self.state,
        }
    }

    /// Simulates the circuit for `cycles` cycles and returns the history of `targets` and every
    /// signal they depend on, see [Circuit::dependency_closure].
    ///
    /// Every cycle, each of those signals is recorded with the value it reads as, then the registered
    /// definitions among them are evaluated against the same committed state and committed all at once.
    /// Within a cycle every signal is computed at most once.
    ///
    /// If `restore_state` is true the committed values of the signals involved are restored once the
    /// simulation ends, whether it succeeded or not.
    ///
    /// # Errors
    ///
    /// Returns [SimError::CombinationalCycle] if a combinational definition depends on itself.
    /// The committed values are left as they were at the start of the failing cycle, unless
    /// `restore_state` is true.
    ///
    /// # Example
    /// ```
    /// # use wires::{CircuitBuilder, select};
    /// let mut g = CircuitBuilder::new();
    /// let enable = g.signal("enable");
    /// let value = g.signal("value");
    /// g.assign(enable, 1);
    /// g.register(value, select(enable, value + 1, value));
    ///
    /// let c = &mut g.init();
    /// let h = c.simulate(&[value], 5, true).unwrap();
    /// assert_eq!(h["enable"], vec![1, 1, 1, 1, 1]);
    /// assert_eq!(h["value"], vec![0, 1, 2, 3, 4]);
    /// assert_eq!(c.value(value), 0);
    ///
    /// c.simulate(&[value], 5, false).unwrap();
    /// assert_eq!(c.value(value), 5);
    /// ```
    pub fn simulate(
        &mut self,
        targets: &[SignalIndex],
        cycles: usize,
        restore_state: bool,
    ) -> Result<Histories, SimError> {
        let closure = self.dependency_closure(targets);

        let snapshot = if restore_state {
            let slots: Vec<usize> = closure.iter().map(|s| s.idx).collect();
            Some(self.state.snapshot(&slots))
        } else {
            None
        };

        let result = self.run(&closure, cycles);

        if let Some(snapshot) = snapshot {
            self.state.restore(&snapshot);
        }
        result
    }

    /// Same as [Circuit::simulate] with a single target.
    pub fn simulate_signal(
        &mut self,
        target: SignalIndex,
        cycles: usize,
        restore_state: bool,
    ) -> Result<Histories, SimError> {
        self.simulate(&[target], cycles, restore_state)
    }

    /// Same as [Circuit::simulate] with targets looked up by name.
    ///
    /// # Errors
    ///
    /// Returns [SimError::UnknownSignal] if any name doesn't belong to a signal, nothing is simulated.
    pub fn simulate_named(
        &mut self,
        targets: &[&str],
        cycles: usize,
        restore_state: bool,
    ) -> Result<Histories, SimError> {
        let targets = targets
            .iter()
            .map(|name| {
                self.signal(name)
                    .ok_or_else(|| SimError::UnknownSignal(name.to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;
        self.simulate(&targets, cycles, restore_state)
    }

    fn run(
        &mut self,
        closure: &IndexSet<SignalIndex>,
        cycles: usize,
    ) -> Result<Histories, SimError> {
        let mut histories: Vec<Vec<i64>> = closure
            .iter()
            .map(|_| Vec::with_capacity(cycles))
            .collect();
        let registered: Vec<(SignalIndex, ExprIndex)> = closure
            .iter()
            .filter_map(|s| self.signals[s.idx].registered.map(|root| (*s, root)))
            .collect();
        // Allocated outside to prevent allocations in the cycle loop.
        let mut next_values = Vec::with_capacity(registered.len());

        for _ in 0..cycles {
            {
                let evaluator = self.evaluator();
                let mut ctx = EvalContext::new(self.signals.len());

                for (history, signal) in histories.iter_mut().zip(closure) {
                    history.push(evaluator.value_of(*signal, &mut ctx)?);
                }
                for (signal, root) in &registered {
                    next_values.push((signal.idx, evaluator.eval(*root, &mut ctx)?));
                }
            }
            self.commit(&next_values);
            next_values.clear();
        }

        Ok(closure
            .iter()
            .zip(histories)
            .map(|(signal, history)| (self.signals[signal.idx].name.clone(), history))
            .collect())
    }

    /// Commits all `updates` at once.
    fn commit(&mut self, updates: &[(usize, i64)]) {
        #[cfg(feature = "debug_signals")]
        for (idx, value) in updates {
            if self.probes.contains(&SignalIndex::new(*idx)) && self.state.get(*idx) != *value {
                println!("{}:{}", self.signals[*idx].name, value);
            }
        }
        self.state.commit(updates);
    }

    /// Returns the value `signal` reads as against the current committed values, without simulating.
    ///
    /// A fresh [EvalContext] is used and nothing is committed.
    ///
    /// # Errors
    ///
    /// Returns [SimError::CombinationalCycle] if a combinational definition depends on itself.
    pub fn peek(&self, signal: SignalIndex) -> Result<i64, SimError> {
        let mut ctx = EvalContext::new(self.signals.len());
        self.evaluator().value_of(signal, &mut ctx)
    }

    /// Returns the committed value of `signal`.
    pub fn value(&self, signal: SignalIndex) -> i64 {
        self.state.get(signal.idx)
    }

    /// Overwrites the committed value of `signal`.
    ///
    /// Signals without definitions keep the value until it is overwritten again,
    /// which makes them the inputs of the circuit.
    pub fn set_value(&mut self, signal: SignalIndex, value: i64) {
        #[cfg(feature = "debug_signals")]
        if self.probes.contains(&signal) && self.state.get(signal.idx) != value {
            println!("{}:{}", self.signals[signal.idx].name, value);
        }
        self.state.set(signal.idx, value)
    }

    /// Returns the signal named `name`.
    pub fn signal(&self, name: &str) -> Option<SignalIndex> {
        self.names.get(name).copied()
    }

    /// Returns the name of `signal`.
    pub fn name(&self, signal: SignalIndex) -> &str {
        &self.signals[signal.idx].name
    }

    /// Returns an iterator over every signal of the circuit.
    pub fn signals(&self) -> impl Iterator<Item = (SignalIndex, &Signal)> + '_ {
        self.signals
            .iter()
            .enumerate()
            .map(|(i, s)| (SignalIndex::new(i), s))
    }

    /// Returns the number of signals in the circuit.
    pub fn len(&self) -> usize {
        self.signals.len()
    }

    /// Returns true if the circuit has no signals.
    pub fn is_empty(&self) -> bool {
        self.signals.is_empty()
    }

    /// Returns the number of expression nodes in the circuit.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Returns the [ExprNode] at `idx`.
    pub fn node(&self, idx: ExprIndex) -> &ExprNode {
        &self.nodes[idx.idx]
    }

    /// Returns `targets` and every signal referenced, directly or transitively, by the combinational
    /// or registered definitions of the signals in the set, ordered by discovery.
    ///
    /// # Example
    /// ```
    /// # use wires::CircuitBuilder;
    /// let mut g = CircuitBuilder::new();
    /// let a = g.signal("a");
    /// let b = g.signal("b");
    /// let c = g.signal("c");
    /// g.assign(b, a + 1);
    /// g.register(c, c + 1);
    ///
    /// let circuit = g.init();
    /// let closure = circuit.dependency_closure(&[b]);
    /// assert_eq!(closure.into_iter().collect::<Vec<_>>(), vec![b, a]);
    /// ```
    pub fn dependency_closure(&self, targets: &[SignalIndex]) -> IndexSet<SignalIndex> {
        dependency_closure(self, targets)
    }

    /// Returns the label of the node at `idx` in [Circuit::to_dot].
    fn label(&self, idx: ExprIndex) -> String {
        match self.nodes[idx.idx] {
            ExprNode::Signal(signal) => self.name(signal).to_string(),
            node => node.to_string(),
        }
    }

    /// Returns the circuit in [dot](https://en.wikipedia.org/wiki/DOT_(graph_description_language)) format.
    ///
    /// Every signal is a "WIRE:name" node, edges go from operands to the nodes that use them
    /// and from definitions to the signals they define.
    pub fn to_dot(&self) -> String {
        use petgraph::dot::{Config, Dot};
        let mut graph = petgraph::Graph::<String, ()>::new();

        let nodes: Vec<_> = (0..self.nodes.len())
            .map(|i| graph.add_node(self.label(ei!(i))))
            .collect();
        let wires: Vec<_> = self
            .signals
            .iter()
            .map(|s| graph.add_node(format!("WIRE:{}", s.name)))
            .collect();

        for (i, node) in self.nodes.iter().enumerate() {
            graph.extend_with_edges(node.children().iter().map(|child| (nodes[child.idx], nodes[i])));
            if let ExprNode::Signal(signal) = node {
                graph.add_edge(wires[signal.idx], nodes[i], ());
            }
        }
        for (i, signal) in self.signals.iter().enumerate() {
            graph.extend_with_edges(signal.roots().map(|root| (nodes[root.idx], wires[i])));
        }
        format!("{:?}", Dot::with_config(&graph, &[Config::EdgeNoLabel]))
    }

    /// Dumps the circuit in dot format to `filename`, see [Circuit::to_dot].
    pub fn dump_dot<P: AsRef<Path>>(&self, filename: P) -> std::io::Result<()> {
        std::fs::write(filename, self.to_dot())
    }
}

impl SignalGraph for Circuit {
    fn node(&self, idx: ExprIndex) -> &ExprNode {
        &self.nodes[idx.idx]
    }
    fn signal_at(&self, idx: SignalIndex) -> &Signal {
        &self.signals[idx.idx]
    }
    fn node_slots(&self) -> usize {
        self.nodes.len()
    }
}
