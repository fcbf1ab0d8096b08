/// Calls [`Pass::field`][crate::Pass::field] once per listed struct member,
/// using the member's name as the key.
///
/// Every field is processed even if an earlier one fails; the macro evaluates
/// to `true` only if all of them succeeded.
///
/// ```
/// use konfig::{fields, Manager};
///
/// #[derive(Default)]
/// struct Server {
///     port: u16,
///     host: String,
/// }
///
/// let mut manager = Manager::<Server>::new("server.toml");
/// manager.fallible_section("server", |pass, state| fields!(pass, state => port, host));
/// ```
#[macro_export]
macro_rules! fields {
    ($pass:expr, $state:expr => $($member:ident),+ $(,)?) => {{
        let mut all_succeeded = true;
        $(
            all_succeeded &= $pass.field(stringify!($member), &mut $state.$member);
        )+
        all_succeeded
    }};
}
