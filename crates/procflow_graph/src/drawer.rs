// SPDX-License-Identifier: MIT OR Apache-2.0
//! Custom property drawer associations for the editor layer.
//!
//! An editor that renders step parameters can ask, per `(parameter type,
//! field)`, whether a custom drawer was associated with that field. The
//! association is checked when it is made: only types implementing
//! [`PropertyDrawer`] can be bound. The graph itself never looks at this
//! table and never invokes a drawer.

use std::any::{type_name, Any, TypeId};
use std::collections::HashMap;
use std::fmt;

/// Result of drawing a property - indicates if the value was changed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawResult {
    /// Value was not modified
    Unchanged,
    /// Value was modified, needs to be applied
    Changed,
}

impl DrawResult {
    /// Whether the drawer modified the value
    pub fn is_changed(&self) -> bool {
        matches!(self, DrawResult::Changed)
    }
}

/// A widget able to render one field of a parameter block
pub trait PropertyDrawer: 'static {
    /// Render `field` of `instance`, possibly editing it
    fn draw(&mut self, instance: &mut dyn Any, field: &str) -> DrawResult;
}

fn instantiate<D: PropertyDrawer + Default>() -> Box<dyn PropertyDrawer> {
    Box::new(D::default())
}

/// The drawer type bound to a field
#[derive(Clone, Copy)]
pub struct DrawerBinding {
    drawer_type: TypeId,
    drawer_name: &'static str,
    factory: fn() -> Box<dyn PropertyDrawer>,
}

impl DrawerBinding {
    /// Binding to drawer type `D`
    pub fn of<D: PropertyDrawer + Default>() -> Self {
        Self {
            drawer_type: TypeId::of::<D>(),
            drawer_name: type_name::<D>(),
            factory: instantiate::<D>,
        }
    }

    /// Fully qualified name of the drawer type
    pub fn drawer_name(&self) -> &'static str {
        self.drawer_name
    }

    /// Whether the bound drawer is `D`
    pub fn is<D: PropertyDrawer>(&self) -> bool {
        self.drawer_type == TypeId::of::<D>()
    }

    /// Create a fresh drawer instance
    pub fn instantiate(&self) -> Box<dyn PropertyDrawer> {
        (self.factory)()
    }
}

impl fmt::Debug for DrawerBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("DrawerBinding").field(&self.drawer_name).finish()
    }
}

/// Table of custom drawers keyed by parameter type and field name
#[derive(Debug, Default)]
pub struct DrawerRegistry {
    bindings: HashMap<(TypeId, String), DrawerBinding>,
}

impl DrawerRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind drawer `D` to `field` of parameter type `T`.
    ///
    /// Returns the binding it replaced, if any.
    pub fn associate<T, D>(&mut self, field: impl Into<String>) -> Option<DrawerBinding>
    where
        T: Any,
        D: PropertyDrawer + Default,
    {
        let field = field.into();
        tracing::debug!(
            owner = type_name::<T>(),
            %field,
            drawer = type_name::<D>(),
            "associated property drawer"
        );
        self.bindings
            .insert((TypeId::of::<T>(), field), DrawerBinding::of::<D>())
    }

    /// Drawer bound to `field` of parameter type `T`
    pub fn binding<T: Any>(&self, field: &str) -> Option<&DrawerBinding> {
        self.binding_for_type(TypeId::of::<T>(), field)
    }

    /// Drawer bound to `field` of the concrete type behind `instance`
    pub fn binding_for(&self, instance: &dyn Any, field: &str) -> Option<&DrawerBinding> {
        self.binding_for_type(instance.type_id(), field)
    }

    /// Drawer bound to `field` of the type identified by `owner`
    pub fn binding_for_type(&self, owner: TypeId, field: &str) -> Option<&DrawerBinding> {
        self.bindings.get(&(owner, field.to_string()))
    }

    /// Number of bound fields
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    /// Whether no field is bound
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}
