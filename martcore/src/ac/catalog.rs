//! The fixed permission catalog for the storefront administration
//! console.  Deployments sync this into the permission store; request
//! traffic never mutates it.

use crate::ac::permission::PermissionCategory;

#[derive(Clone, Copy, Debug)]
pub struct CatalogEntry {
    pub code: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub category: PermissionCategory,
}

const fn menu(
    code: &'static str,
    name: &'static str,
    description: &'static str,
) -> CatalogEntry {
    CatalogEntry {
        code,
        name,
        description,
        category: PermissionCategory::Menu,
    }
}

const fn action(
    code: &'static str,
    name: &'static str,
    description: &'static str,
) -> CatalogEntry {
    CatalogEntry {
        code,
        name,
        description,
        category: PermissionCategory::Action,
    }
}

pub const CATALOG: &[CatalogEntry] = &[
    menu("menu.dashboard", "Dashboard", "View the console dashboard"),

    menu("menu.categories", "Categories", "View the category section"),
    action("action.categories.create", "Create categories", "Add a new category"),
    action("action.categories.edit", "Edit categories", "Modify an existing category"),
    action("action.categories.delete", "Delete categories", "Remove a category"),

    menu("menu.products", "Products", "View the product section"),
    action("action.products.create", "Create products", "Add a new product"),
    action("action.products.edit", "Edit products", "Modify an existing product"),
    action("action.products.delete", "Delete products", "Remove a product"),

    menu("menu.customers", "Customers", "View the customer section"),
    action("action.customers.edit", "Edit customers", "Modify customer details"),
    action("action.customers.delete", "Delete customers", "Remove a customer account"),

    menu("menu.orders", "Orders", "View the order section"),
    action("action.orders.edit", "Edit orders", "Modify order details"),
    action("action.orders.cancel", "Cancel orders", "Cancel a pending order"),

    menu("menu.users", "Users", "View the console user section"),
    action("action.users.edit", "Edit users", "Assign roles to console users"),

    menu("menu.roles", "Roles", "View roles and their permissions"),
    action("action.roles.create", "Create roles", "Add a new role"),
    action("action.roles.edit", "Edit roles", "Rewrite the permissions assigned to a role"),
    action("action.roles.delete", "Delete roles", "Remove a role no user belongs to"),
];
