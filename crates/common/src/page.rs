//! Page objects bound to a console place

use async_trait::async_trait;

use crate::console::Console;
use crate::error::TestsuiteResult;
use crate::place::PlaceRequest;

/// A console page addressed by a fixed name token.
///
/// Implementors only provide the token and a constructor; navigation is
/// shared.
#[async_trait]
pub trait Page: Sized + Send {
    /// Name token of the place, e.g. `batch-jberet-configuration`
    const PLACE: &'static str;

    /// Builds the page object once the console shows the place
    async fn create(console: &Console) -> TestsuiteResult<Self>;

    /// Place request with the given parameters
    fn place(params: &[(&str, &str)]) -> PlaceRequest {
        params
            .iter()
            .fold(PlaceRequest::new(Self::PLACE), |place, (key, value)| place.with(*key, *value))
    }

    /// Opens the page and returns the page object
    async fn navigate(console: &Console, params: &[(&str, &str)]) -> TestsuiteResult<Self> {
        console.navigate(&Self::place(params)).await?;
        Self::create(console).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Sample;

    #[async_trait]
    impl Page for Sample {
        const PLACE: &'static str = "sample";

        async fn create(_console: &Console) -> TestsuiteResult<Self> {
            Ok(Sample)
        }
    }

    #[test]
    fn test_place_keeps_parameter_order() {
        let place = Sample::place(&[("b", "2"), ("a", "1")]);
        assert_eq!(place.to_string(), "sample;b=2;a=1");
    }

    #[test]
    fn test_place_without_parameters() {
        assert_eq!(Sample::place(&[]).to_string(), "sample");
    }
}
