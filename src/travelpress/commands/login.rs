use crate::auth::{Authenticator, require_user};
use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;

pub fn run<A: Authenticator + ?Sized>(auth: &mut A, email: &str, password: &str) -> Result<CmdResult> {
    let user = auth.sign_in(email, password)?;
    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!("Signed in as {}", user.email)));
    Ok(result.with_user(user))
}

pub fn logout<A: Authenticator + ?Sized>(auth: &mut A) -> Result<CmdResult> {
    let mut result = CmdResult::default();
    match auth.current_user() {
        Some(user) => {
            auth.sign_out()?;
            result.add_message(CmdMessage::success(format!("Signed out {}", user.email)));
        }
        None => result.add_message(CmdMessage::info("Not signed in")),
    }
    Ok(result)
}

pub fn whoami<A: Authenticator + ?Sized>(auth: &A) -> Result<CmdResult> {
    let user = require_user(auth)?;
    let mut result = CmdResult::default();
    result.add_message(CmdMessage::info(user.email.clone()));
    Ok(result.with_user(user))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::LocalAuthenticator;
    use crate::auth::fixtures::{PASSWORD, account};
    use crate::error::PressError;

    #[test]
    fn login_then_whoami_then_logout() {
        let mut auth = LocalAuthenticator::in_memory(vec![account("u1", "a@example.com")]);
        assert!(matches!(whoami(&auth), Err(PressError::NotSignedIn)));

        let res = run(&mut auth, "a@example.com", PASSWORD).unwrap();
        assert_eq!(res.user.unwrap().uid, "u1");
        assert_eq!(whoami(&auth).unwrap().messages[0].content, "a@example.com");

        let res = logout(&mut auth).unwrap();
        assert!(res.messages[0].content.contains("Signed out"));
        assert!(auth.current_user().is_none());
    }

    #[test]
    fn logout_when_signed_out_is_informational() {
        let mut auth = LocalAuthenticator::in_memory(vec![]);
        let res = logout(&mut auth).unwrap();
        assert_eq!(res.messages[0].content, "Not signed in");
    }
}
