pub mod http_notification_sink;
