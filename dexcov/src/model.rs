//! The in-memory coverage model.
//!
//! The model is populated once from the statically discovered classes and methods, and afterwards only the covered
//! flags of the methods change as coverage records are merged in.

use identity::MethodIdentity;

use fixedbitset::FixedBitSet;

use std::collections::{btree_map, BTreeMap, HashSet};

//----------------------------------------------------------------------------------------------------------------------
//{{{ MethodCoverage

/// Instruction-level coverage of a single method.
#[derive(Clone, Debug)]
pub struct MethodCoverage {
    identity: MethodIdentity,
    units: Vec<u32>,
    covered: FixedBitSet,
    abstract_or_native: bool,
}

impl MethodCoverage {
    /// Creates the coverage of a concrete method.
    ///
    /// `units` lists the width in code units of every instruction of the method body, in program counter order.
    pub fn new(identity: MethodIdentity, units: Vec<u32>) -> MethodCoverage {
        let covered = FixedBitSet::with_capacity(units.len());
        MethodCoverage {
            identity,
            units,
            covered,
            abstract_or_native: false,
        }
    }

    /// Creates the coverage of an abstract or native method, which has no instructions.
    pub fn without_body(identity: MethodIdentity) -> MethodCoverage {
        MethodCoverage {
            identity,
            units: Vec::new(),
            covered: FixedBitSet::with_capacity(0),
            abstract_or_native: true,
        }
    }

    pub fn identity(&self) -> &MethodIdentity {
        &self.identity
    }

    /// The width of every instruction in code units.
    pub fn units(&self) -> &[u32] {
        &self.units
    }

    pub fn is_abstract_or_native(&self) -> bool {
        self.abstract_or_native
    }

    /// Total length of the method body in code units.
    pub fn code_units_len(&self) -> usize {
        self.units.iter().map(|&u| u as usize).sum()
    }

    /// Number of instructions.
    pub fn instructions_count(&self) -> usize {
        self.units.len()
    }

    /// Number of instructions that have been covered.
    pub fn instructions_covered(&self) -> usize {
        self.covered.count_ones(..)
    }

    /// Whether the instruction at `index` (not program counter) has been covered.
    pub fn is_instruction_covered(&self, index: usize) -> bool {
        self.covered.contains(index)
    }

    /// Whether at least one instruction has been covered.
    pub fn is_covered(&self) -> bool {
        self.instructions_covered() > 0
    }

    /// Marks the instructions whose first code unit is set in `bits` as covered.
    ///
    /// Flags are never cleared.
    ///
    /// # Panics
    ///
    /// Panics if `bits` is not exactly as long as the method body. The caller must have validated the length.
    pub(crate) fn apply(&mut self, bits: &FixedBitSet) {
        let mut pc = 0;
        for (i, &width) in self.units.iter().enumerate() {
            if bits.contains(pc) {
                self.covered.insert(i);
            }
            pc += width as usize;
        }
        assert_eq!(pc, bits.len(), "sanity check failed: {} has {} code units, but the coverage bits are {} long", self.identity, pc, bits.len());
    }
}

//}}}
//----------------------------------------------------------------------------------------------------------------------
//{{{ ClassCoverage

/// Coverage of all methods in a class.
#[derive(Clone, Debug, Default)]
pub struct ClassCoverage {
    name: String,
    methods: BTreeMap<MethodIdentity, MethodCoverage>,
}

impl ClassCoverage {
    pub fn new<S: Into<String>>(name: S) -> ClassCoverage {
        ClassCoverage {
            name: name.into(),
            methods: BTreeMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Iterates all methods in the class, ordered by identity.
    pub fn methods(&self) -> btree_map::Values<MethodIdentity, MethodCoverage> {
        self.methods.values()
    }

    pub fn method(&self, identity: &MethodIdentity) -> Option<&MethodCoverage> {
        self.methods.get(identity)
    }

    pub fn len(&self) -> usize {
        self.methods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.methods.is_empty()
    }
}

//}}}
//----------------------------------------------------------------------------------------------------------------------
//{{{ Registration & CoverageModel

/// Result of registering a class or method into the [`CoverageModel`].
///
/// [`CoverageModel`]: ./struct.CoverageModel.html
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum Registration {
    /// The entry is new and has been added.
    Inserted,
    /// An entry with the same key already exists, or the key has been excluded before. Nothing changed.
    RejectedDuplicate,
    /// A method with the same identity was registered before. Since it is not known which of the two the coverage
    /// records refer to, both are dropped and the identity is excluded from now on.
    RemovedAsAmbiguous,
}

/// All classes and methods known to a run.
#[derive(Clone, Debug, Default)]
pub struct CoverageModel {
    classes: BTreeMap<String, ClassCoverage>,
    ambiguous: HashSet<MethodIdentity>,
}

impl CoverageModel {
    pub fn new() -> CoverageModel {
        CoverageModel::default()
    }

    /// Registers an empty class. The first registration of a name wins.
    pub fn add_class<S: Into<String>>(&mut self, name: S) -> Registration {
        match self.classes.entry(name.into()) {
            btree_map::Entry::Occupied(_) => Registration::RejectedDuplicate,
            btree_map::Entry::Vacant(entry) => {
                let class = ClassCoverage::new(entry.key().clone());
                entry.insert(class);
                Registration::Inserted
            },
        }
    }

    /// Registers a method into the class named by its identity, creating the class if needed.
    pub fn add_method(&mut self, method: MethodCoverage) -> Registration {
        if self.ambiguous.contains(method.identity()) {
            return Registration::RejectedDuplicate;
        }

        let class_name = method.identity().class_name().to_owned();
        let class = self.classes.entry(class_name).or_insert_with(|| ClassCoverage::new(method.identity().class_name()));
        match class.methods.entry(method.identity().clone()) {
            btree_map::Entry::Occupied(entry) => {
                let (identity, _) = entry.remove_entry();
                self.ambiguous.insert(identity);
                Registration::RemovedAsAmbiguous
            },
            btree_map::Entry::Vacant(entry) => {
                entry.insert(method);
                Registration::Inserted
            },
        }
    }

    pub fn class(&self, name: &str) -> Option<&ClassCoverage> {
        self.classes.get(name)
    }

    pub fn method(&self, identity: &MethodIdentity) -> Option<&MethodCoverage> {
        self.classes.get(identity.class_name()).and_then(|class| class.methods.get(identity))
    }

    pub(crate) fn method_mut(&mut self, identity: &MethodIdentity) -> Option<&mut MethodCoverage> {
        self.classes.get_mut(identity.class_name()).and_then(|class| class.methods.get_mut(identity))
    }

    /// Iterates all classes, ordered by name.
    pub fn classes(&self) -> btree_map::Values<String, ClassCoverage> {
        self.classes.values()
    }

    /// Whether the identity has been excluded for being registered more than once.
    pub fn is_ambiguous(&self, identity: &MethodIdentity) -> bool {
        self.ambiguous.contains(identity)
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}

//}}}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(name: &str) -> MethodIdentity {
        MethodIdentity::new("com.app.Foo", name, "()V")
    }

    #[test]
    fn test_apply_is_sticky() {
        let mut method = MethodCoverage::new(id("f"), vec![1, 1, 1, 1]);
        let mut bits = FixedBitSet::with_capacity(4);
        bits.insert(0);
        method.apply(&bits);
        assert_eq!(method.instructions_covered(), 1);

        let mut bits = FixedBitSet::with_capacity(4);
        bits.insert(2);
        bits.insert(3);
        method.apply(&bits);
        assert_eq!(method.instructions_covered(), 3);
        assert!(method.is_instruction_covered(0));
        assert!(!method.is_instruction_covered(1));
    }

    #[test]
    fn test_apply_uses_program_counter() {
        // instructions start at pc 0, 3 and 4.
        let mut method = MethodCoverage::new(id("f"), vec![3, 1, 2]);
        assert_eq!(method.code_units_len(), 6);
        let mut bits = FixedBitSet::with_capacity(6);
        bits.insert(1);
        bits.insert(2);
        bits.insert(4);
        method.apply(&bits);
        assert!(!method.is_instruction_covered(0));
        assert!(!method.is_instruction_covered(1));
        assert!(method.is_instruction_covered(2));
    }

    #[test]
    #[should_panic(expected = "sanity check failed")]
    fn test_apply_wrong_length() {
        let mut method = MethodCoverage::new(id("f"), vec![2, 2]);
        method.apply(&FixedBitSet::with_capacity(3));
    }

    #[test]
    fn test_add_class() {
        let mut model = CoverageModel::new();
        assert_eq!(model.add_class("com.app.Foo"), Registration::Inserted);
        assert_eq!(model.add_class("com.app.Foo"), Registration::RejectedDuplicate);
        assert_eq!(model.classes().count(), 1);
    }

    #[test]
    fn test_add_method_ambiguous() {
        let mut model = CoverageModel::new();
        assert_eq!(model.add_method(MethodCoverage::new(id("f"), vec![1])), Registration::Inserted);
        assert_eq!(model.add_method(MethodCoverage::new(id("g"), vec![1])), Registration::Inserted);
        assert_eq!(model.add_method(MethodCoverage::new(id("f"), vec![2])), Registration::RemovedAsAmbiguous);
        assert_eq!(model.add_method(MethodCoverage::new(id("f"), vec![1])), Registration::RejectedDuplicate);

        assert!(model.method(&id("f")).is_none());
        assert!(model.is_ambiguous(&id("f")));
        assert!(model.method(&id("g")).is_some());
        assert_eq!(model.class("com.app.Foo").map(ClassCoverage::len), Some(1));
    }
}
