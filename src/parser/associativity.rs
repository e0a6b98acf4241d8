
//..................................................................

// Operator Associativity.
// Decides which of two operators of equal precedence is applied first.
custom_derive! {
    #[derive(Copy, Clone, Debug, PartialEq, Eq, EnumDisplay, EnumFromStr, IterVariants(AssociativityVariants), IterVariantNames(AssociativityVariantNames))]
    pub enum Associativity {
        Left,
        Right
    }
}

impl Associativity {
    /// True if an operator already waiting on the operator stack should be moved to the output
    /// before an incoming operator with the same precedence is pushed.
    /// Only left associative operators yield to an equal: "8-3-2" means "(8-3)-2".
    pub fn yields_to_equal_precedence(&self) -> bool {
        *self == Associativity::Left
    }
}
