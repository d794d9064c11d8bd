pub mod posting_service;
