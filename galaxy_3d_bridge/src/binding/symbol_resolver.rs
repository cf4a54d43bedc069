/// Symbol resolver: turns a MemberKey into a ResolvedBinding.

use std::sync::Arc;
use crate::binding::member::{MemberKey, ResolvedBinding};
use crate::binding::native::{Resolution, Resolver};
use crate::error::{Error, Result};

pub struct SymbolResolver {
    resolver: Arc<dyn Resolver>,
}

impl SymbolResolver {
    pub fn new(resolver: Arc<dyn Resolver>) -> Self {
        Self { resolver }
    }

    /// Ask the native registry for `key`.
    ///
    /// Never retries with another compat tag: a tag mismatch means the
    /// caller was generated against a different engine ABI.
    ///
    /// # Errors
    ///
    /// - `Error::UnknownMember` if the class has no such member
    /// - `Error::IncompatibleAbi` if it exists only at other tags
    pub fn resolve(&self, key: &MemberKey) -> Result<ResolvedBinding> {
        match self.resolver.resolve(key.class(), key.member(), key.compat_tag()) {
            Resolution::Found { token, shape } => {
                crate::bridge_debug!(
                    "galaxy3d::SymbolResolver",
                    "Resolved {} (arity {}, returns {})",
                    key,
                    shape.arity(),
                    shape.return_kind
                );
                Ok(ResolvedBinding::new(key.clone(), token, shape))
            }
            Resolution::UnknownMember => {
                crate::bridge_warn!("galaxy3d::SymbolResolver", "No native member {}", key);
                Err(Error::UnknownMember {
                    class: key.class().to_string(),
                    member: key.member().to_string(),
                })
            }
            Resolution::IncompatibleAbi { available } => {
                crate::bridge_warn!(
                    "galaxy3d::SymbolResolver",
                    "Native member {} only available at compat tags {:?}",
                    key,
                    available
                );
                Err(Error::IncompatibleAbi {
                    class: key.class().to_string(),
                    member: key.member().to_string(),
                    compat_tag: key.compat_tag(),
                    available,
                })
            }
        }
    }
}
