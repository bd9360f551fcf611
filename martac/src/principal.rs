use martcore::ac::{
    session,
    user,
};

/// The authenticated party behind one request: the stored user record
/// together with the session their bearer token resolved to.
#[derive(Clone, Debug)]
pub struct Principal {
    user: user::User,
    session: session::Session,
}

mod impls;
