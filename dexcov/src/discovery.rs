//! Classes and methods found in a binary.
//!
//! Reading the binary itself is done elsewhere. This module only describes what the reader hands over, one
//! [`ClassListing`] per class definition, in the order they appear in the binary.
//!
//! [`ClassListing`]: ./struct.ClassListing.html

#[cfg(all(feature = "serde", feature = "serde_json"))]
use error::Result;
use identity::MethodIdentity;

#[cfg(all(feature = "serde", feature = "serde_json"))]
use std::io::Read;

/// A class definition.
#[derive(Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ClassListing {
    /// Name of the class, either as a type descriptor (`Lcom/example/Foo;`) or dotted (`com.example.Foo`).
    pub name: String,

    /// Methods defined in this class.
    #[cfg_attr(feature = "serde", serde(default))]
    pub methods: Vec<MethodListing>,
}

/// A method definition.
#[derive(Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MethodListing {
    /// Name of the method.
    pub name: String,

    /// Descriptor of the parameter and return types, e.g. `(ILjava/lang/String;)V`.
    pub descriptor: String,

    /// Width in code units of each instruction of the method body. `None` if the method is abstract or native.
    #[cfg_attr(feature = "serde", serde(default))]
    pub code: Option<Vec<u32>>,
}

impl MethodListing {
    /// Identity of this method when defined in the class `class_name`.
    pub fn identity(&self, class_name: &str) -> MethodIdentity {
        MethodIdentity::new(class_name, self.name.as_str(), self.descriptor.as_str())
    }
}

/// Reads a JSON array of class listings.
#[cfg(all(feature = "serde", feature = "serde_json"))]
pub fn from_reader<R: Read>(reader: R) -> Result<Vec<ClassListing>> {
    Ok(::serde_json::from_reader(reader)?)
}
