pub mod pix_client;
