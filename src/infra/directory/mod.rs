pub mod http_occupant_directory;
