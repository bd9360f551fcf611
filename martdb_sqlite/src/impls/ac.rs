mod permission;
mod role;
mod session;
mod user;
