pub mod ecpay_client;
