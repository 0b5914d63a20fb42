pub mod clock;
pub mod email_service;
pub mod review_queue;
pub mod storage;
pub mod upload_service;
