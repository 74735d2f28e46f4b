use super::{Expiry, Storage};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};

/// [`Storage`] backed by the request's cookies.
///
/// Changes accumulate in the jar; return [`CookieStorage::into_jar`] from the
/// handler so they reach the browser as `Set-Cookie` headers.
#[derive(Debug, Clone)]
pub struct CookieStorage {
    jar: CookieJar,
    secure: bool,
}

impl CookieStorage {
    pub fn new(jar: CookieJar, secure: bool) -> Self {
        Self { jar, secure }
    }

    pub fn into_jar(self) -> CookieJar {
        self.jar
    }
}

impl Storage for CookieStorage {
    fn get(&self, key: &str) -> Option<String> {
        let cookie = self.jar.get(key)?;
        let value = urlencoding::decode(cookie.value())
            .map(|v| v.into_owned())
            .unwrap_or_else(|_| cookie.value().to_string());
        if value.is_empty() {
            None
        } else {
            Some(value)
        }
    }

    fn set(&mut self, key: &str, value: &str, expiry: Expiry) {
        let mut cookie = Cookie::build((key.to_owned(), urlencoding::encode(value).into_owned()))
            .path("/")
            .http_only(true)
            .same_site(SameSite::Strict)
            .secure(self.secure);

        if let Expiry::After(ttl) = expiry {
            cookie = cookie.max_age(time::Duration::seconds(ttl.num_seconds()));
        }

        self.jar = self.jar.clone().add(cookie);
    }

    fn delete(&mut self, key: &str) {
        self.jar = self
            .jar
            .clone()
            .remove(Cookie::build((key.to_owned(), "")).path("/"));
    }
}
