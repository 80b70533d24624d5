//! Runtime helper provisioning.
//!
//! Generated calls reference helper functions that the host materializes.
//! The pass never looks helpers up ambiently: it is handed a
//! [`HelperProvider`] at construction and asks it for a callee node each time
//! a call site needs one.

use indexmap::IndexMap;
use objrest_ast::{NodeArena, NodeIndex, UniqueNames};

const EXTENDS_SOURCE: &str = r#"var _extends = Object.assign || function (target) {
    for (var i = 1; i < arguments.length; i++) {
        var source = arguments[i];
        for (var key in source) {
            if (Object.prototype.hasOwnProperty.call(source, key)) {
                target[key] = source[key];
            }
        }
    }
    return target;
};
"#;

const OBJECT_WITHOUT_PROPERTIES_SOURCE: &str = r#"function _objectWithoutProperties(obj, keys) {
    var target = {};
    for (var i in obj) {
        if (keys.indexOf(i) >= 0) continue;
        if (!Object.prototype.hasOwnProperty.call(obj, i)) continue;
        target[i] = obj[i];
    }
    return target;
}
"#;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Helper {
    /// `_extends(target, ...sources)`: shallow own-enumerable copy, later
    /// sources win.
    Extends,
    /// `_objectWithoutProperties(source, keys)`: fresh object with every own
    /// enumerable property of `source` whose key is not in `keys`.
    ObjectWithoutProperties,
}

impl Helper {
    /// Preferred binding name. A provider may hand out a different one when
    /// the compilation unit already uses it.
    pub fn binding(self) -> &'static str {
        match self {
            Helper::Extends => "_extends",
            Helper::ObjectWithoutProperties => "_objectWithoutProperties",
        }
    }

    /// Runtime source declaring [`Helper::binding`].
    pub fn source(self) -> &'static str {
        match self {
            Helper::Extends => EXTENDS_SOURCE,
            Helper::ObjectWithoutProperties => OBJECT_WITHOUT_PROPERTIES_SOURCE,
        }
    }

    /// Runtime source declaring the helper under `name`.
    pub fn declaration(self, name: &str) -> String {
        // The declared name is the first occurrence; the bodies never refer
        // to it.
        self.source().replacen(self.binding(), name, 1)
    }
}

/// Host capability that materializes helpers on request.
pub trait HelperProvider {
    /// Return a fresh, detached callee expression referring to `helper`.
    ///
    /// `names` holds every identifier of the compilation unit plus the
    /// temporaries generated so far; a provider that declares the helper
    /// itself reserves its binding there.
    fn request_helper(
        &mut self,
        arena: &mut NodeArena,
        names: &mut UniqueNames,
        helper: Helper,
    ) -> NodeIndex;
}

/// Default provider: hands out identifier references and records which
/// helpers were needed, in first-use order.
///
/// Each helper's binding is reserved on first use, so a unit that already
/// binds `_extends` gets `_extends2` instead.
#[derive(Debug, Default, Clone)]
pub struct HelperRegistry {
    used: IndexMap<Helper, String>,
}

impl HelperRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_used(&self, helper: Helper) -> bool {
        self.used.contains_key(&helper)
    }

    /// Name the generated code calls `helper` by, once requested.
    pub fn binding_of(&self, helper: Helper) -> Option<&str> {
        self.used.get(&helper).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.used.is_empty()
    }

    pub fn used(&self) -> impl Iterator<Item = Helper> + '_ {
        self.used.keys().copied()
    }

    /// Runtime declarations for every requested helper, ready to be placed
    /// ahead of the transformed program.
    pub fn prelude(&self) -> String {
        self.used
            .iter()
            .map(|(helper, name)| helper.declaration(name))
            .collect()
    }
}

impl HelperProvider for HelperRegistry {
    fn request_helper(
        &mut self,
        arena: &mut NodeArena,
        names: &mut UniqueNames,
        helper: Helper,
    ) -> NodeIndex {
        let name = self.used.entry(helper).or_insert_with(|| {
            let name = names.generate(helper.binding());
            tracing::debug!(helper = helper.binding(), binding = %name, "[helpers] first use");
            name
        });
        arena.ident(name.as_str())
    }
}

impl<H: HelperProvider + ?Sized> HelperProvider for &mut H {
    fn request_helper(
        &mut self,
        arena: &mut NodeArena,
        names: &mut UniqueNames,
        helper: Helper,
    ) -> NodeIndex {
        (**self).request_helper(arena, names, helper)
    }
}
