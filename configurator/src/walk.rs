//! Struct traversal that produces a [`Catalog`].

use std::rc::Rc;

use tracing::{debug, trace, warn};

use crate::catalog::{Catalog, FieldDescriptor, Lineage};
use crate::error::Error;
use crate::tag::parse_tag;
use crate::types::{Bindable, Configure, FieldSlot, Shape};

/// Catalog every bindable leaf reachable from `root`, in declaration order.
///
/// Nil `Option`s that point to a struct are filled with `Default::default()`
/// so their fields can be cataloged; this is the only mutation performed.
/// A nil `Option` pointing to anything else stays `None` and is cataloged as
/// a single leaf.
///
/// # Errors
///
/// - [`Error::InvalidConfig`] if `root` is not a struct
/// - [`Error::InvalidTagFormat`] if any field, leaf or not, carries a
///   malformed tag; no partial catalog is returned
pub fn build_catalog<T>(root: &mut T) -> Result<Catalog<'_>, Error>
where
    T: Bindable + ?Sized,
{
    let declared = root.declared_type();
    let identity = root.type_identity();
    let Shape::Struct(target) = root.shape() else {
        return Err(Error::invalid_config(&declared));
    };

    let mut fields = Vec::new();
    let mut active = vec![identity];
    walk(target, None, &mut active, &mut fields)?;

    debug!(root = %declared, fields = fields.len(), "built field catalog");
    Ok(Catalog::new(fields))
}

enum Resolved<'a> {
    Leaf(&'a mut dyn Bindable),
    Struct(&'a mut dyn Configure, &'static str),
    /// Nil pointer to a struct already being walked; left untouched.
    Cycle,
}

fn walk<'a>(
    target: &'a mut dyn Configure,
    parent: Option<&Rc<Lineage>>,
    active: &mut Vec<&'static str>,
    out: &mut Vec<FieldDescriptor<'a>>,
) -> Result<(), Error> {
    for slot in target.fields() {
        let FieldSlot {
            name,
            tag,
            embedded,
            value,
        } = slot;

        let directives = parse_tag(tag).map_err(|e| Error::InvalidTagFormat {
            field: name.to_string(),
            directive: e.directive.as_str(),
            expected: e.directive.placeholder(),
        })?;

        if value.declared_type().is_timestamp() {
            trace!(field = name, "cataloged timestamp leaf");
            out.push(FieldDescriptor::new(name, directives, parent.cloned(), value));
            continue;
        }

        match resolve(name, value, active) {
            Resolved::Leaf(handle) => {
                if embedded {
                    warn!(field = name, "`embed` has no effect on a non-struct field");
                }
                trace!(field = name, "cataloged leaf");
                out.push(FieldDescriptor::new(name, directives, parent.cloned(), handle));
            }
            Resolved::Struct(inner, identity) => {
                let node = Rc::new(Lineage::new(name, directives, embedded, parent.cloned()));
                active.push(identity);
                walk(inner, Some(&node), active, out)?;
                active.pop();
            }
            Resolved::Cycle => {}
        }
    }

    Ok(())
}

/// Follow pointers until a leaf or a struct is reached.
fn resolve<'a>(
    name: &str,
    mut current: &'a mut dyn Bindable,
    active: &[&'static str],
) -> Resolved<'a> {
    loop {
        let identity = current.type_identity();
        match current.shape() {
            Shape::Leaf(leaf) => return Resolved::Leaf(leaf),
            Shape::Struct(inner) => return Resolved::Struct(inner, identity),
            Shape::Pointer(ptr) => {
                if ptr.is_nil() {
                    let target = ptr.target_type();
                    if !target.is_struct() {
                        return Resolved::Leaf(ptr.as_bindable());
                    }
                    if active.contains(&ptr.target_identity()) {
                        trace!(field = name, target = %target, "left recursive pointer nil");
                        return Resolved::Cycle;
                    }
                    trace!(field = name, target = %target, "allocated nil pointer target");
                }
                current = ptr.target_mut();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Configure;

    #[derive(Debug, Default, Configure)]
    struct Flat {
        #[config(tag = "env,flag")]
        pub host: String,
        #[config(tag = "env=SERVICE_PORT,default=8080")]
        pub port: i64,
        #[allow(dead_code)]
        secret: String,
        pub verbose: bool,
    }

    #[derive(Debug, Default, Configure)]
    struct Node {
        #[config(tag = "env")]
        pub id: u32,
        pub next: Option<Box<Node>>,
    }

    #[derive(Debug, Default, Configure)]
    struct Deep {
        pub inner: Option<Option<Box<Flat>>>,
    }

    mod db {
        use crate::Configure;

        #[derive(Debug, Default, Configure)]
        pub struct Config {
            #[config(tag = "env")]
            pub url: String,
        }
    }

    #[derive(Debug, Default, Configure)]
    struct Config {
        #[config(tag = "env")]
        pub name: String,
        pub db: Option<db::Config>,
    }

    #[derive(Debug, Default, Configure)]
    struct Wrapper<T: Bindable + Default> {
        pub inner: T,
        pub next: Option<Box<Wrapper<String>>>,
    }

    #[derive(Debug, Default, Configure)]
    struct Tenant {
        #[config(tag = "env")]
        pub name: String,
        pub owner: Option<Owner>,
    }

    #[derive(Debug, Default, Configure)]
    struct Owner {
        #[config(tag = "env")]
        pub email: String,
        pub tenant: Option<Box<Tenant>>,
    }

    #[derive(Debug, Default, Configure)]
    struct EmbeddedLeaf {
        #[config(embed, tag = "env")]
        pub level: u8,
    }

    #[test]
    fn test_flat_struct_in_declaration_order() {
        let mut config = Flat::default();
        let catalog = build_catalog(&mut config).unwrap();

        let names: Vec<_> = catalog.iter().map(|f| f.name()).collect();
        assert_eq!(names, ["host", "port", "verbose"]);
        assert!(catalog.iter().all(|f| f.parent().is_none()));
    }

    #[test]
    fn test_scalar_root_is_invalid() {
        let mut not_a_struct = 5_i32;
        let err = build_catalog(&mut not_a_struct).unwrap_err();
        assert!(matches!(err, Error::InvalidConfig { .. }));
    }

    #[test]
    fn test_option_root_is_invalid() {
        let mut wrapped = Some(Flat::default());
        let err = build_catalog(&mut wrapped).unwrap_err();
        assert!(matches!(err, Error::InvalidConfig { .. }));
    }

    #[test]
    fn test_recursive_pointer_stops_at_cycle() {
        let mut node = Node::default();
        let catalog = build_catalog(&mut node).unwrap();
        let keys: Vec<_> = catalog.iter().map(|f| f.env_key()).collect();
        assert_eq!(keys, ["ID"]);
        drop(catalog);
        assert!(node.next.is_none());
    }

    #[test]
    fn test_populated_recursive_chain_is_walked() {
        let mut node = Node {
            id: 1,
            next: Some(Box::new(Node::default())),
        };
        let catalog = build_catalog(&mut node).unwrap();
        let keys: Vec<_> = catalog.iter().map(|f| f.env_key()).collect();
        assert_eq!(keys, ["ID", "NEXT_ID"]);
    }

    #[test]
    fn test_nil_double_pointer_is_a_leaf() {
        let mut deep = Deep::default();
        let catalog = build_catalog(&mut deep).unwrap();
        assert_eq!(catalog.len(), 1);
        assert_eq!(
            catalog.get(0).map(|f| f.declared_type().to_string()),
            Some("option<option<struct Flat>>".to_string())
        );
        drop(catalog);
        assert!(deep.inner.is_none());
    }

    #[test]
    fn test_populated_double_pointer_is_resolved() {
        let mut deep = Deep {
            inner: Some(None),
        };
        let catalog = build_catalog(&mut deep).unwrap();
        let paths: Vec<_> = catalog.iter().map(|f| f.path().join(".")).collect();
        assert_eq!(paths, ["inner.host", "inner.port", "inner.verbose"]);
        drop(catalog);
        assert!(matches!(deep.inner, Some(Some(_))));
    }

    #[test]
    fn test_same_named_structs_are_not_a_cycle() {
        let mut config = Config::default();
        let catalog = build_catalog(&mut config).unwrap();
        let keys: Vec<_> = catalog.iter().map(|f| f.env_key()).collect();
        assert_eq!(keys, ["NAME", "DB_URL"]);
        drop(catalog);
        assert!(config.db.is_some());
    }

    #[test]
    fn test_generic_instances_are_distinct_types() {
        let mut wrapper = Wrapper::<u16>::default();
        let catalog = build_catalog(&mut wrapper).unwrap();
        let paths: Vec<_> = catalog.iter().map(|f| f.path().join(".")).collect();
        assert_eq!(paths, ["inner", "next.inner"]);
        drop(catalog);

        let next = wrapper.next.as_ref().unwrap();
        assert!(next.next.is_none());
    }

    #[test]
    fn test_mutual_recursion_stops_at_cycle() {
        let mut tenant = Tenant::default();
        let catalog = build_catalog(&mut tenant).unwrap();
        let keys: Vec<_> = catalog.iter().map(|f| f.env_key()).collect();
        assert_eq!(keys, ["NAME", "OWNER_EMAIL"]);
        drop(catalog);

        let owner = tenant.owner.as_ref().unwrap();
        assert!(owner.tenant.is_none());
    }

    #[test]
    fn test_embed_on_leaf_keeps_its_segment() {
        let mut config = EmbeddedLeaf::default();
        let catalog = build_catalog(&mut config).unwrap();
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.get(0).map(|f| f.env_key()), Some("LEVEL".to_string()));
    }
}
