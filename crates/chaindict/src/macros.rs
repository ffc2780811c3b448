/// Allocates a detached chain node
macro_rules! boxnode {
    ( $key: expr, $value: expr, $hash: expr ) => {
        Box::new($crate::linked_list::Node {
            key: $key,
            value: $value,
            hash: $hash,
            next: None,
        })
    };
}

/// Implements [`Key`](crate::Key) for types whose std `Hash` already
/// agrees with their `Eq`, so hashing can never fail
macro_rules! hashable {
    ( $( $t: ty ),* $(,)? ) => {
        $(
            impl $crate::key::Key for $t {
                #[inline]
                fn hash_key<H: ::std::hash::Hasher>(&self, state: &mut H) -> $crate::Result<()> {
                    ::std::hash::Hash::hash(self, state);
                    Ok(())
                }
            }
        )*
    };
}

/// Implements [`Key`](crate::Key) for tuples whose members are all keys
macro_rules! hashable_tuple {
    ( $( ( $( $name: ident ),+ ) ),* $(,)? ) => {
        $(
            impl<$( $name: $crate::key::Key ),+> $crate::key::Key for ( $( $name, )+ ) {
                #[allow(non_snake_case)]
                fn hash_key<H: ::std::hash::Hasher>(&self, state: &mut H) -> $crate::Result<()> {
                    let ( $( $name, )+ ) = self;
                    $( $name.hash_key(state)?; )+
                    Ok(())
                }
            }
        )*
    };
}
