//! Core type representation.
//!
//! Types are interned: structurally equal [`TypeData`] values share one
//! [`TypeId`], so type identity is a `u32` comparison. Generic instantiations
//! of one declaration are distinct `TypeId`s sharing a [`DefId`].

use smallvec::SmallVec;
use std::fmt;

/// Interned type handle.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeId(pub u32);

impl TypeId {
    // Intrinsics are pre-interned in this order by `TypeInterner::new`.
    pub const ERROR: Self = Self(0);
    pub const VOID: Self = Self(1);
    pub const BOOL: Self = Self(2);
    pub const INT32: Self = Self(3);
    pub const INT64: Self = Self(4);
    pub const FLOAT64: Self = Self(5);
    pub const STRING: Self = Self(6);
    pub const OBJECT: Self = Self(7);
    pub const CHAR: Self = Self(8);

    /// First id handed out for non-intrinsic types.
    pub const FIRST_USER: u32 = 9;

    pub const fn is_intrinsic(self) -> bool {
        self.0 < Self::FIRST_USER
    }
}

/// Built-in types.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum IntrinsicKind {
    Error,
    Void,
    Bool,
    Int32,
    Int64,
    Float64,
    String,
    Object,
    Char,
}

impl IntrinsicKind {
    /// All intrinsics in `TypeId` order.
    pub const ALL: [Self; 9] = [
        Self::Error,
        Self::Void,
        Self::Bool,
        Self::Int32,
        Self::Int64,
        Self::Float64,
        Self::String,
        Self::Object,
        Self::Char,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Void => "void",
            Self::Bool => "bool",
            Self::Int32 => "int",
            Self::Int64 => "long",
            Self::Float64 => "double",
            Self::String => "string",
            Self::Object => "object",
            Self::Char => "char",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "void" => Self::Void,
            "bool" => Self::Bool,
            "int" => Self::Int32,
            "long" => Self::Int64,
            "double" => Self::Float64,
            "string" => Self::String,
            "object" => Self::Object,
            "char" => Self::Char,
            _ => return None,
        })
    }

    pub const fn type_id(self) -> TypeId {
        TypeId(self as u32)
    }

    pub const fn is_value_type(self) -> bool {
        matches!(
            self,
            Self::Bool | Self::Int32 | Self::Int64 | Self::Float64 | Self::Char
        )
    }
}

/// Identifier of a declared interface, class or struct.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DefId(pub u32);

/// Identifier of a bound member (including accessors).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MemberId(pub u32);

/// Identifier of a type parameter of a type or of a generic method.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeParamId(pub u32);

/// Structural type data.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum TypeData {
    Intrinsic(IntrinsicKind),
    /// A declared type, possibly instantiated. `args` is empty for non-generic
    /// declarations and has one entry per type parameter otherwise.
    Named {
        def: DefId,
        args: SmallVec<[TypeId; 2]>,
    },
    TypeParam(TypeParamId),
    Array(TypeId),
    /// `T?` over a value type.
    Nullable(TypeId),
}

/// Declared variance of a type parameter.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Variance {
    #[default]
    Invariant,
    /// `out T`
    Covariant,
    /// `in T`
    Contravariant,
}

impl Variance {
    pub const fn is_variant(self) -> bool {
        !matches!(self, Self::Invariant)
    }

    pub const fn describe(self) -> &'static str {
        match self {
            Self::Invariant => "invariant",
            Self::Covariant => "covariant",
            Self::Contravariant => "contravariant",
        }
    }
}

impl fmt::Display for Variance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.describe())
    }
}

/// Declaration that owns a type parameter.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum TypeParamOwner {
    Type(DefId),
    Member(MemberId),
}

#[derive(Clone, Debug)]
pub struct TypeParamInfo {
    pub name: String,
    pub owner: TypeParamOwner,
    /// Position within the owner's type parameter list.
    pub ordinal: u32,
    pub variance: Variance,
    /// Constraint types (`where T : I<T>, U`), in declaration order.
    pub constraints: Vec<TypeId>,
}
