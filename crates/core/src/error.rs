use snafu::Snafu;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum ConfigError {
    #[snafu(display("failed to extract chat settings on `{stage}`: {source}"))]
    Extract {
        stage: &'static str,
        #[snafu(source(from(figment::Error, Box::new)))]
        source: Box<figment::Error>,
    },
    #[snafu(display("invalid chat setting on `{stage}`: {details}"))]
    InvalidSetting {
        stage: &'static str,
        details: String,
    },
}

pub type ConfigResult<T> = Result<T, ConfigError>;
