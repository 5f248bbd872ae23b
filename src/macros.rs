//! The `contract!` code-generation backend and its helper macros.
//!
//! The helpers are exported because macro expansion happens in the caller's crate; they
//! are implementation detail and hidden from the documentation.

/// Declares an interface contract and generates its proxy plumbing.
///
/// Takes an ordinary (object-safe) trait declaration and expands to:
///
/// 1. the trait itself, with `Send + Sync + 'static` bounds added so targets can be
///    shared across proxies;
/// 2. a static member table and an implementation of
///    [`Contract`](crate::contract::Contract) for `dyn Trait`, including the
///    terminal-dispatch table that unboxes arguments and invokes the real target member;
/// 3. a forwarding implementation of the trait for
///    [`Proxy<dyn Trait>`](crate::proxy::Proxy), whose every member boxes its arguments,
///    drives the interception pipeline, and converts the return slot back to the
///    declared type.
///
/// # Member Forms
///
/// Members are `&self` functions. Property and indexer accessors are declared with a
/// marker attribute and are ordinary members everywhere else in the engine - only their
/// accessor category differs:
///
/// ```rust
/// interpose::contract! {
///     /// A small keyed store.
///     pub trait Store {
///         fn len(&self) -> usize;
///         fn clear(&self);
///         #[getter] fn capacity(&self) -> usize;
///         #[setter] fn set_capacity(&self, value: usize);
///         #[index_getter] fn entry(&self, key: String) -> u64;
///         #[index_setter] fn set_entry(&self, key: String, value: u64);
///     }
/// }
/// ```
///
/// # Type Requirements
///
/// Parameter types must be `Any + Clone + Send`; return types additionally `Default`
/// (see [`value`](crate::value) for why). Receivers other than `&self`, and member
/// attributes other than the accessor markers, are not part of the grammar.
///
/// # Generic Methods
///
/// Generic methods cannot be proxied (their dispatch cannot be tabled per contract) and
/// are rejected when the macro expands:
///
/// ```rust,compile_fail
/// interpose::contract! {
///     pub trait Broken {
///         fn convert<T>(&self, value: T) -> T;
///     }
/// }
/// ```
///
/// # Examples
///
/// ```rust
/// use std::sync::Arc;
/// use interpose::ProxyFactory;
///
/// interpose::contract! {
///     pub trait Repository {
///         fn find(&self, id: u64) -> Option<String>;
///         fn count(&self) -> usize;
///     }
/// }
///
/// struct InMemory;
///
/// impl Repository for InMemory {
///     fn find(&self, id: u64) -> Option<String> {
///         (id == 1).then(|| String::from("first"))
///     }
///
///     fn count(&self) -> usize {
///         1
///     }
/// }
///
/// # fn main() -> interpose::Result<()> {
/// let builder = ProxyFactory::global().create_proxy::<dyn Repository>()?;
/// let proxy = builder.create_instance(Arc::new(InMemory), []);
///
/// assert_eq!(proxy.find(1), Some(String::from("first")));
/// assert_eq!(proxy.count(), 1);
/// # Ok(())
/// # }
/// ```
#[macro_export]
macro_rules! contract {
    (
        $(#[$attr:meta])*
        $vis:vis trait $name:ident { $($body:tt)* }
    ) => {
        $crate::contract!(@munch
            meta = [ $(#[$attr])* $vis trait $name ],
            members = [ ],
            rest = [ $($body)* ]
        );
    };

    // Accessor members, one arm per marker. The grammar is deliberately permissive
    // (any parameter list, optional return); accessor shape rules are enforced when
    // the descriptor is built, like every other runtime contract check.
    (@munch
        meta = [ $($meta:tt)* ],
        members = [ $($members:tt)* ],
        rest = [ #[getter] fn $f:ident ( &self $(, $p:ident : $pt:ty)* $(,)? ) $(-> $r:ty)? ; $($rest:tt)* ]
    ) => {
        $crate::contract!(@munch
            meta = [ $($meta)* ],
            members = [ $($members)* { PropertyGet $f ( $($p : $pt),* ) ( $($r)? ) } ],
            rest = [ $($rest)* ]
        );
    };
    (@munch
        meta = [ $($meta:tt)* ],
        members = [ $($members:tt)* ],
        rest = [ #[setter] fn $f:ident ( &self $(, $p:ident : $pt:ty)* $(,)? ) $(-> $r:ty)? ; $($rest:tt)* ]
    ) => {
        $crate::contract!(@munch
            meta = [ $($meta)* ],
            members = [ $($members)* { PropertySet $f ( $($p : $pt),* ) ( $($r)? ) } ],
            rest = [ $($rest)* ]
        );
    };
    (@munch
        meta = [ $($meta:tt)* ],
        members = [ $($members:tt)* ],
        rest = [ #[index_getter] fn $f:ident ( &self $(, $p:ident : $pt:ty)* $(,)? ) $(-> $r:ty)? ; $($rest:tt)* ]
    ) => {
        $crate::contract!(@munch
            meta = [ $($meta)* ],
            members = [ $($members)* { IndexGet $f ( $($p : $pt),* ) ( $($r)? ) } ],
            rest = [ $($rest)* ]
        );
    };
    (@munch
        meta = [ $($meta:tt)* ],
        members = [ $($members:tt)* ],
        rest = [ #[index_setter] fn $f:ident ( &self $(, $p:ident : $pt:ty)* $(,)? ) $(-> $r:ty)? ; $($rest:tt)* ]
    ) => {
        $crate::contract!(@munch
            meta = [ $($meta)* ],
            members = [ $($members)* { IndexSet $f ( $($p : $pt),* ) ( $($r)? ) } ],
            rest = [ $($rest)* ]
        );
    };

    // Plain methods.
    (@munch
        meta = [ $($meta:tt)* ],
        members = [ $($members:tt)* ],
        rest = [ fn $f:ident ( &self $(, $p:ident : $pt:ty)* $(,)? ) $(-> $r:ty)? ; $($rest:tt)* ]
    ) => {
        $crate::contract!(@munch
            meta = [ $($meta)* ],
            members = [ $($members)* { Method $f ( $($p : $pt),* ) ( $($r)? ) } ],
            rest = [ $($rest)* ]
        );
    };

    // Generic methods cannot be proxied.
    (@munch
        meta = [ $($meta:tt)* ],
        members = [ $($members:tt)* ],
        rest = [ $(#[$marker:ident])? fn $f:ident < $($tail:tt)* ]
    ) => {
        ::core::compile_error!("generic methods are not supported on proxy contracts");
    };

    // All members consumed.
    (@munch
        meta = [ $($meta:tt)* ],
        members = [ $($members:tt)* ],
        rest = [ ]
    ) => {
        $crate::contract!(@emit meta = [ $($meta)* ], members = [ $($members)* ]);
    };

    // Anything else is outside the contract grammar.
    (@munch
        meta = [ $($meta:tt)* ],
        members = [ $($members:tt)* ],
        rest = [ $($tail:tt)+ ]
    ) => {
        ::core::compile_error!(
            "unsupported contract member: members are `&self` functions, optionally marked #[getter], #[setter], #[index_getter] or #[index_setter]"
        );
    };

    (@emit
        meta = [ $(#[$attr:meta])* $vis:vis trait $name:ident ],
        members = [ $( { $kind:ident $f:ident ( $($p:ident : $pt:ty),* ) ( $($r:ty)? ) } )* ]
    ) => {
        $(#[$attr])*
        $vis trait $name: ::core::marker::Send + ::core::marker::Sync + 'static {
            $(
                #[allow(missing_docs)]
                fn $f(&self $(, $p: $pt)*) $(-> $r)?;
            )*
        }

        const _: () = {
            // Slot assignment: discriminants follow declaration order.
            #[allow(non_camel_case_types, dead_code, clippy::enum_variant_names)]
            enum __Slot { $($f),* }

            static __SHAPE: $crate::contract::ContractShape = $crate::contract::ContractShape {
                name: ::core::stringify!($name),
                members: &[
                    $(
                        $crate::contract::MemberShape {
                            name: ::core::stringify!($f),
                            kind: $crate::contract::MemberKind::$kind,
                            parameters: &[
                                $(
                                    $crate::contract::ParamShape {
                                        name: ::core::stringify!($p),
                                        ty: ::core::stringify!($pt),
                                    }
                                ),*
                            ],
                            returns: $crate::__contract_return_name!($($r)?),
                        }
                    ),*
                ],
            };

            impl $crate::contract::Contract for dyn $name {
                fn shape() -> &'static $crate::contract::ContractShape {
                    &__SHAPE
                }

                #[allow(unused_variables)]
                fn call_target(
                    target: &Self,
                    slot: usize,
                    arguments: &mut [$crate::value::Value],
                ) -> ::core::option::Option<$crate::value::Value> {
                    match slot {
                        $(
                            s if s == __Slot::$f as usize => {
                                $crate::__contract_invoke_target!(
                                    target, $f, arguments, ( $($p : $pt),* ), ( $($r)? )
                                )
                            }
                        )*
                        _ => ::core::unreachable!(),
                    }
                }
            }

            impl $name for $crate::proxy::Proxy<dyn $name> {
                $(
                    fn $f(&self $(, $p: $pt)*) $(-> $r)? {
                        let __arguments =
                            ::std::vec![$($crate::value::boxed($p)),*].into_boxed_slice();
                        $crate::__contract_stub_return!(
                            ::core::stringify!($f),
                            self.dispatch(__Slot::$f as usize, __arguments),
                            ( $($r)? )
                        )
                    }
                )*
            }
        };
    };
}

/// Terminal-dispatch body for one member: unbox the snapshot in declaration order, call
/// the real member, box a returned result.
#[doc(hidden)]
#[macro_export]
macro_rules! __contract_invoke_target {
    ($target:ident, $f:ident, $arguments:ident, ( $($p:ident : $pt:ty),* ), ( ) ) => {{
        #[allow(unused_mut, unused_variables)]
        let mut __index = 0_usize;
        $target.$f($( $crate::__contract_next_argument!($f, $arguments, __index, $pt) ),*);
        ::core::option::Option::None
    }};
    ($target:ident, $f:ident, $arguments:ident, ( $($p:ident : $pt:ty),* ), ( $r:ty ) ) => {{
        #[allow(unused_mut, unused_variables)]
        let mut __index = 0_usize;
        let __result: $r =
            $target.$f($( $crate::__contract_next_argument!($f, $arguments, __index, $pt) ),*);
        ::core::option::Option::Some($crate::value::boxed(__result))
    }};
}

/// Unboxes the next positional argument for a terminal call.
#[doc(hidden)]
#[macro_export]
macro_rules! __contract_next_argument {
    ($f:ident, $arguments:ident, $index:ident, $pt:ty) => {{
        let __value = $crate::value::extract_argument::<$pt>(
            ::core::stringify!($f),
            $arguments,
            $index,
        );
        $index += 1;
        __value
    }};
}

/// Converts a dispatch result into the stub's declared return type.
#[doc(hidden)]
#[macro_export]
macro_rules! __contract_stub_return {
    ($member:expr, $dispatch:expr, ( ) ) => {{
        let _ = $dispatch;
    }};
    ($member:expr, $dispatch:expr, ( $r:ty ) ) => {
        $crate::value::coerce_return::<$r>($member, $dispatch)
    };
}

/// Declared-return-type text for a member shape.
#[doc(hidden)]
#[macro_export]
macro_rules! __contract_return_name {
    () => {
        ::core::option::Option::None
    };
    ($r:ty) => {
        ::core::option::Option::Some(::core::stringify!($r))
    };
}
