use super::closure::{dependency_closure, SignalGraph};
use super::expr::IntoExpr;
use super::handles::*;
use super::node::*;
use super::optimizations::*;
use super::Circuit;
use crate::data_structures::{Slab, State};
use casey::pascal;
use indexmap::IndexSet;
use std::collections::HashMap;
#[cfg(feature = "debug_signals")]
use std::collections::HashSet;

/// Creates a named constructor for every unary operation.
macro_rules! unary_constructors {
    ($($name:ident),*) => {
        $(
            #[doc = concat!("Returns the [ExprIndex] of a new `", stringify!($name), "` node over `operand`.")]
            pub fn $name(&mut self, operand: ExprIndex) -> ExprIndex {
                self.unary({ use UnaryOp::*; pascal!($name) }, operand)
            }
        )*
    };
}

/// Creates a named constructor for every binary operation.
macro_rules! binary_constructors {
    ($($name:ident),*) => {
        $(
            #[doc = concat!("Returns the [ExprIndex] of a new `", stringify!($name), "` node over `lhs` and `rhs`.")]
            pub fn $name(&mut self, lhs: ExprIndex, rhs: ExprIndex) -> ExprIndex {
                self.binary({ use BinaryOp::*; pascal!($name) }, lhs, rhs)
            }
        )*
    };
}

/// Data structure that represents a synchronous circuit under construction, it can be
/// [initialized](CircuitBuilder::init) to simulate it.
///
/// The circuit is a set of named signals and a graph of expression nodes over them.
/// Every signal can have a combinational definition, recomputed every cycle from the committed state,
/// and a registered definition, whose value becomes the committed value at the end of the cycle.
///
/// The builder is also the registry of every signal created for the circuit, see [CircuitBuilder::signals].
///
/// # Examples
/// An accumulator.
/// ```
/// # use wires::CircuitBuilder;
/// let mut g = CircuitBuilder::new();
///
/// let a = g.signal("a");
/// let b = g.signal("b");
/// let sum = g.signal("sum");
/// let acc = g.signal("acc");
///
/// g.assign(a, 1);
/// g.assign(b, 2);
/// g.assign(sum, a + b);
/// g.register(acc, acc + sum);
///
/// let c = &mut g.init();
/// let histories = c.simulate(&[acc], 6, true).unwrap();
///
/// assert_eq!(histories["acc"], vec![0, 3, 6, 9, 12, 15]);
/// assert_eq!(histories["sum"], vec![3; 6]);
/// assert_eq!(histories.keys().collect::<Vec<_>>(), vec!["a", "acc", "b", "sum"]);
/// ```
///
/// Nodes can also be created one by one and shared.
/// ```
/// # use wires::CircuitBuilder;
/// let mut g = CircuitBuilder::new();
/// let x = g.signal_with_initial("x", 5);
/// let square = g.signal("square");
///
/// let x_ref = g.reference(x);
/// let product = g.mul(x_ref, x_ref);
/// g.assign(square, product);
///
/// let c = &mut g.init();
/// assert_eq!(c.simulate_signal(square, 1, true).unwrap()["square"], vec![25]);
/// ```
#[derive(Debug, Clone)]
pub struct CircuitBuilder {
    pub(super) nodes: Slab<ExprIndex, ExprNode>,
    pub(super) signals: Vec<Signal>,
    names: HashMap<String, SignalIndex>,
    pub(super) references: HashMap<SignalIndex, ExprIndex>,
    #[cfg(feature = "debug_signals")]
    probes: HashSet<SignalIndex>,
}

/// Intermediate representation between [CircuitBuilder] and [Circuit].
///
/// Nodes are placed contiguously and every reference to them has been renumbered accordingly.
struct CompactedCircuit {
    nodes: Vec<ExprNode>,
    signals: Vec<Signal>,
    names: HashMap<String, SignalIndex>,
    #[cfg(feature = "debug_signals")]
    probes: HashSet<SignalIndex>,
}

impl CircuitBuilder {
    /// Returns an empty [CircuitBuilder].
    pub fn new() -> CircuitBuilder {
        CircuitBuilder {
            nodes: Slab::new(),
            signals: Vec::new(),
            names: HashMap::new(),
            references: HashMap::new(),
            #[cfg(feature = "debug_signals")]
            probes: HashSet::new(),
        }
    }

    /// Returns the [SignalIndex] of a new signal named `name` starting at 0.
    ///
    /// # Panics
    ///
    /// Will panic if a signal named `name` already exists, names identify signals in simulation results.
    pub fn signal<S: Into<String>>(&mut self, name: S) -> SignalIndex {
        self.signal_with_initial(name, 0)
    }

    /// Returns the [SignalIndex] of a new signal named `name` with committed value `initial`.
    ///
    /// # Panics
    ///
    /// Will panic if a signal named `name` already exists.
    pub fn signal_with_initial<S: Into<String>>(&mut self, name: S, initial: i64) -> SignalIndex {
        let name = name.into();
        assert!(
            !self.names.contains_key(&name),
            "A signal named `{}` already exists",
            name
        );
        let idx = SignalIndex::new(self.signals.len());
        self.names.insert(name.clone(), idx);
        self.signals.push(Signal::new(name, initial));
        idx
    }

    /// Sets the committed value `signal` starts with.
    pub fn set_initial(&mut self, signal: SignalIndex, initial: i64) {
        self.get_signal_mut(signal).initial = initial;
    }

    /// Sets the combinational definition of `signal`, replacing the previous one.
    ///
    /// The signal will read as `expr` evaluated against the committed state of the current cycle.
    pub fn assign<E: IntoExpr>(&mut self, signal: SignalIndex, expr: E) {
        let root = expr.into_expr(self);
        self.get_signal_mut(signal).combinational = Some(root);
    }

    /// Sets the registered definition of `signal`, replacing the previous one.
    ///
    /// `expr` is evaluated every cycle and its value becomes the committed value of `signal`
    /// at the end of the cycle.
    pub fn register<E: IntoExpr>(&mut self, signal: SignalIndex, expr: E) {
        let root = expr.into_expr(self);
        self.get_signal_mut(signal).registered = Some(root);
    }

    /// Inserts `node` and returns its index.
    ///
    /// # Panics
    ///
    /// Will panic if any child of `node` doesn't exist in this builder.
    fn insert(&mut self, node: ExprNode) -> ExprIndex {
        for child in node.children() {
            assert!(
                self.nodes.get(child).is_some(),
                "Expression {} doesn't exist in this builder",
                child
            );
        }
        self.nodes.insert(node)
    }

    /// Returns the [ExprIndex] of a new constant node.
    pub fn constant(&mut self, value: i64) -> ExprIndex {
        self.insert(ExprNode::Constant(value))
    }

    /// Returns the [ExprIndex] of the node that reads `signal`.
    ///
    /// There is a single reference node per signal.
    ///
    /// # Panics
    ///
    /// Will panic if `signal` doesn't exist in this builder.
    pub fn reference(&mut self, signal: SignalIndex) -> ExprIndex {
        self.get_signal(signal);
        if let Some(idx) = self.references.get(&signal) {
            return *idx;
        }
        let idx = self.insert(ExprNode::Signal(signal));
        self.references.insert(signal, idx);
        idx
    }

    /// Returns the [ExprIndex] of a new node applying `op` to `operand`.
    pub fn unary(&mut self, op: UnaryOp, operand: ExprIndex) -> ExprIndex {
        self.insert(ExprNode::Unary { op, operand })
    }

    /// Returns the [ExprIndex] of a new node applying `op` to `lhs` and `rhs`.
    pub fn binary(&mut self, op: BinaryOp, lhs: ExprIndex, rhs: ExprIndex) -> ExprIndex {
        self.insert(ExprNode::Binary { op, lhs, rhs })
    }

    /// Returns the [ExprIndex] of a new node that evaluates to `then_branch` if `condition` is not 0
    /// and to `else_branch` otherwise. Only the chosen branch is evaluated.
    pub fn select(
        &mut self,
        condition: ExprIndex,
        then_branch: ExprIndex,
        else_branch: ExprIndex,
    ) -> ExprIndex {
        self.insert(ExprNode::Select {
            condition,
            then_branch,
            else_branch,
        })
    }

    unary_constructors!(neg, bit_not, log_not);

    binary_constructors!(
        add, sub, mul, div, rem, bit_and, bit_or, bit_xor, shl, shr, log_and, log_or, eq, ne,
        lt, le, gt, ge
    );

    /// Returns an immutable reference to the [ExprNode] at `idx`.
    ///
    /// # Panics
    ///
    /// Will panic if `idx` doesn't exist in this builder.
    pub fn get(&self, idx: ExprIndex) -> &ExprNode {
        match self.nodes.get(idx) {
            Some(node) => node,
            None => panic!("Expression {} doesn't exist in this builder", idx),
        }
    }

    /// Returns a mutable reference to the [ExprNode] at `idx`.
    ///
    /// # Panics
    ///
    /// Will panic if `idx` doesn't exist in this builder.
    pub(super) fn get_mut(&mut self, idx: ExprIndex) -> &mut ExprNode {
        match self.nodes.get_mut(idx) {
            Some(node) => node,
            None => panic!("Expression {} doesn't exist in this builder", idx),
        }
    }

    /// Returns the [Signal] at `signal`.
    ///
    /// # Panics
    ///
    /// Will panic if `signal` doesn't exist in this builder.
    pub fn get_signal(&self, signal: SignalIndex) -> &Signal {
        match self.signals.get(signal.idx) {
            Some(s) => s,
            None => panic!("Signal {} doesn't exist in this builder", signal),
        }
    }

    fn get_signal_mut(&mut self, signal: SignalIndex) -> &mut Signal {
        match self.signals.get_mut(signal.idx) {
            Some(s) => s,
            None => panic!("Signal {} doesn't exist in this builder", signal),
        }
    }

    /// Returns the signal named `name`.
    pub fn signal_by_name(&self, name: &str) -> Option<SignalIndex> {
        self.names.get(name).copied()
    }

    /// Returns an iterator over every signal created so far.
    pub fn signals(&self) -> impl Iterator<Item = (SignalIndex, &Signal)> + '_ {
        self.signals
            .iter()
            .enumerate()
            .map(|(i, s)| (SignalIndex::new(i), s))
    }

    /// Returns the number of signals.
    pub fn len(&self) -> usize {
        self.signals.len()
    }

    /// Returns true if no signal has been created.
    pub fn is_empty(&self) -> bool {
        self.signals.is_empty()
    }

    /// Returns the number of expression nodes.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Returns `targets` and every signal they depend on, see [Circuit::dependency_closure].
    pub fn dependency_closure(&self, targets: &[SignalIndex]) -> IndexSet<SignalIndex> {
        dependency_closure(self, targets)
    }

    /// "Probes" `signal`, meaning that whenever a commit changes its value,
    /// the new value will be printed to stdout along with its name.
    #[cfg(feature = "debug_signals")]
    pub fn probe(&mut self, signal: SignalIndex) {
        self.get_signal(signal);
        self.probes.insert(signal);
    }

    /// Returns a new [Circuit] created from `self` after running optimizations.
    pub fn init(mut self) -> Circuit {
        self.optimize();
        self.init_unoptimized()
    }

    /// Returns a new [Circuit] created from `self` without running optimizations.
    pub fn init_unoptimized(self) -> Circuit {
        #[cfg(feature = "debug_signals")]
        let CompactedCircuit {
            nodes,
            signals,
            names,
            probes,
        } = self.compacted();
        #[cfg(not(feature = "debug_signals"))]
        let CompactedCircuit {
            nodes,
            signals,
            names,
        } = self.compacted();

        let initial: Vec<i64> = signals.iter().map(|s| s.initial).collect();
        Circuit {
            nodes: nodes.into(),
            state: State::new(&initial),
            signals: signals.into(),
            names: names.into(),
            #[cfg(feature = "debug_signals")]
            probes: probes.into(),
        }
    }

    /// Returns a new [CompactedCircuit] created from `self`.
    ///
    /// Compacted means that all nodes are placed contiguously and all references to them
    /// are updated accordingly.
    fn compacted(self) -> CompactedCircuit {
        let CircuitBuilder {
            nodes,
            mut signals,
            names,
            #[cfg(feature = "debug_signals")]
            probes,
            ..
        } = self;

        if nodes.len() == nodes.total_len() {
            return CompactedCircuit {
                nodes: nodes.into_iter().map(|(_, node)| node).collect(),
                signals,
                names,
                #[cfg(feature = "debug_signals")]
                probes,
            };
        }

        // Slot order is creation order so children stay in front of their parents.
        let mut index_map = HashMap::<ExprIndex, ExprIndex>::with_capacity(nodes.len());
        let mut new_nodes = Vec::<ExprNode>::with_capacity(nodes.len());

        for (new_index, (old_index, node)) in nodes.into_iter().enumerate() {
            index_map.insert(old_index, ei!(new_index));
            new_nodes.push(node);
        }
        for node in &mut new_nodes {
            node.map_children(|child| index_map[&child]);
        }
        for signal in &mut signals {
            signal.combinational = signal.combinational.map(|root| index_map[&root]);
            signal.registered = signal.registered.map(|root| index_map[&root]);
        }

        CompactedCircuit {
            nodes: new_nodes,
            signals,
            names,
            #[cfg(feature = "debug_signals")]
            probes,
        }
    }

    /// Runs optimization `f` and reports its results.
    #[allow(unused_variables)]
    fn run_optimization<F: Fn(&mut CircuitBuilder)>(&mut self, f: F, name: &'static str) {
        let old_len = self.node_count();
        f(self);
        #[cfg(feature = "debug_signals")]
        println!(
            "Optimization: {}, old size:{}, new size:{}, reduction: {:.1}%",
            name,
            old_len,
            self.node_count(),
            (old_len - self.node_count()) as f32 / old_len.max(1) as f32 * 100.
        );
    }

    /// Runs all optimizations.
    fn optimize(&mut self) {
        self.run_optimization(const_folding_pass, "const folding");
        self.run_optimization(dead_code_elimination_pass, "dead code elimination");
    }
}

impl SignalGraph for CircuitBuilder {
    fn node(&self, idx: ExprIndex) -> &ExprNode {
        self.get(idx)
    }
    fn signal_at(&self, idx: SignalIndex) -> &Signal {
        self.get_signal(idx)
    }
    fn node_slots(&self) -> usize {
        self.nodes.total_len()
    }
}

impl Default for CircuitBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_redefinition_replaces() {
        let mut g = CircuitBuilder::new();
        let a = g.signal("a");
        g.assign(a, 1);
        g.assign(a, 2);
        g.register(a, 3);
        g.register(a, 4);

        let c = &mut g.init();
        let h = c.simulate(&[a], 2, false).unwrap();
        assert_eq!(h["a"], vec![2, 2]);
        assert_eq!(c.value(a), 4);
    }

    #[test]
    #[should_panic(expected = "A signal named `a` already exists")]
    fn test_duplicate_name_panics() {
        let mut g = CircuitBuilder::new();
        g.signal("a");
        g.signal("a");
    }

    #[test]
    #[should_panic(expected = "doesn't exist in this builder")]
    fn test_foreign_expression_panics() {
        let mut other = CircuitBuilder::new();
        for i in 0..10 {
            other.constant(i);
        }
        let foreign = other.constant(10);

        let mut g = CircuitBuilder::new();
        g.neg(foreign);
    }

    #[test]
    fn test_named_constructors() {
        let mut g = CircuitBuilder::new();
        let one = g.constant(1);
        let two = g.constant(2);
        let lt = g.lt(one, two);
        let not = g.log_not(lt);

        assert_eq!(
            *g.get(lt),
            ExprNode::Binary {
                op: BinaryOp::Lt,
                lhs: one,
                rhs: two
            }
        );
        assert_eq!(
            *g.get(not),
            ExprNode::Unary {
                op: UnaryOp::LogNot,
                operand: lt
            }
        );
    }

    #[test]
    fn test_signal_registry() {
        let mut g = CircuitBuilder::new();
        let a = g.signal("a");
        let b = g.signal_with_initial("b", 7);
        g.set_initial(a, -1);

        assert_eq!(g.len(), 2);
        assert_eq!(g.signal_by_name("b"), Some(b));
        assert_eq!(g.signal_by_name("c"), None);
        let initial: Vec<_> = g.signals().map(|(_, s)| s.initial()).collect();
        assert_eq!(initial, vec![-1, 7]);
    }

    #[test]
    fn test_compaction_renumbers_definitions() {
        let mut g = CircuitBuilder::new();
        let a = g.signal_with_initial("a", 3);
        let b = g.signal("b");
        // Replaced definitions leave dead nodes in front of the live ones.
        g.assign(b, a * 100);
        g.assign(b, a + 1);
        g.register(a, a * 2);

        let total = g.node_count();
        let c = &mut g.init_unoptimized();
        assert_eq!(c.node_count(), total);

        let mut g = CircuitBuilder::new();
        let a = g.signal_with_initial("a", 3);
        let b = g.signal("b");
        g.assign(b, a * 100);
        g.assign(b, a + 1);
        g.register(a, a * 2);

        let c = &mut g.init();
        assert!(c.node_count() < total);
        let h = c.simulate(&[b], 3, true).unwrap();
        assert_eq!(h["a"], vec![3, 6, 12]);
        assert_eq!(h["b"], vec![4, 7, 13]);
    }
}
