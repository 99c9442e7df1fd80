//! Method identities.

use std::borrow::Cow;
use std::fmt;

/// Identifies a method by its owning class, name and descriptor.
///
/// This is the key joining the statically discovered methods with the coverage records reported at runtime. The class
/// name is always in the dotted form (`com.example.Foo`), see [`type_to_class_name()`].
///
/// [`type_to_class_name()`]: ./fn.type_to_class_name.html
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MethodIdentity {
    #[cfg_attr(feature = "serde", serde(rename = "class"))]
    class_name: String,
    #[cfg_attr(feature = "serde", serde(rename = "method"))]
    method_name: String,
    descriptor: String,
}

impl MethodIdentity {
    /// Creates a new identity.
    pub fn new<C, M, D>(class_name: C, method_name: M, descriptor: D) -> MethodIdentity
    where
        C: Into<String>,
        M: Into<String>,
        D: Into<String>,
    {
        MethodIdentity {
            class_name: class_name.into(),
            method_name: method_name.into(),
            descriptor: descriptor.into(),
        }
    }

    /// Creates a new identity from the parameter types and return type of the method.
    ///
    /// ```rust
    /// use dexcov::MethodIdentity;
    ///
    /// let id = MethodIdentity::from_signature("com.example.Foo", "bar", &["I", "Ljava/lang/String;"], "V");
    /// assert_eq!(id.descriptor(), "(ILjava/lang/String;)V");
    /// ```
    pub fn from_signature<C, M, P, R>(class_name: C, method_name: M, parameter_types: &[P], return_type: R) -> MethodIdentity
    where
        C: Into<String>,
        M: Into<String>,
        P: AsRef<str>,
        R: AsRef<str>,
    {
        let mut descriptor = String::from("(");
        for ty in parameter_types {
            descriptor.push_str(ty.as_ref());
        }
        descriptor.push(')');
        descriptor.push_str(return_type.as_ref());
        MethodIdentity::new(class_name, method_name, descriptor)
    }

    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    pub fn method_name(&self) -> &str {
        &self.method_name
    }

    pub fn descriptor(&self) -> &str {
        &self.descriptor
    }
}

impl fmt::Display for MethodIdentity {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        write!(fmt, "{}.{}{}", self.class_name, self.method_name, self.descriptor)
    }
}

/// Converts a type descriptor like `Lcom/example/Foo;` to the class name `com.example.Foo`.
///
/// Strings which are not class type descriptors are returned unchanged.
pub fn type_to_class_name(ty: &str) -> Cow<str> {
    if ty.len() >= 2 && ty.starts_with('L') && ty.ends_with(';') {
        Cow::Owned(ty[1..(ty.len() - 1)].replace('/', "."))
    } else {
        Cow::Borrowed(ty)
    }
}
