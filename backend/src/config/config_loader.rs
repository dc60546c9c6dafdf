use anyhow::{Ok, Result};

use super::config_model::{Database, DotEnvyConfig, Ecpay, Server};

pub fn load() -> Result<DotEnvyConfig> {
    dotenvy::dotenv().ok();

    let server = Server {
        port: std::env::var("SERVER_PORT")
            .expect("SERVER_PORT is invalid")
            .parse()?,
        body_limit: std::env::var("SERVER_BODY_LIMIT")
            .expect("SERVER_BODY_LIMIT is invalid")
            .parse()?,
        timeout: std::env::var("SERVER_TIMEOUT")
            .expect("SERVER_TIMEOUT is invalid")
            .parse()?,
    };

    let database = Database {
        url: std::env::var("DATABASE_URL").expect("DATABASE_URL is invalid"),
    };

    let ecpay = Ecpay {
        merchant_id: std::env::var("ECPAY_MERCHANT_ID").expect("ECPAY_MERCHANT_ID is invalid"),
        hash_key: std::env::var("ECPAY_HASH_KEY").expect("ECPAY_HASH_KEY is invalid"),
        hash_iv: std::env::var("ECPAY_HASH_IV").expect("ECPAY_HASH_IV is invalid"),
        payment_url: std::env::var("ECPAY_PAYMENT_URL").expect("ECPAY_PAYMENT_URL is invalid"),
        return_url: std::env::var("ECPAY_RETURN_URL").expect("ECPAY_RETURN_URL is invalid"),
        client_back_url: std::env::var("ECPAY_CLIENT_BACK_URL")
            .expect("ECPAY_CLIENT_BACK_URL is invalid"),
        encrypt_type: std::env::var("ECPAY_ENCRYPT_TYPE").unwrap_or_else(|_| "1".to_string()),
    };

    Ok(DotEnvyConfig {
        server,
        database,
        ecpay,
    })
}
