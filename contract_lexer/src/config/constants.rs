pub mod compile_time {
    pub mod source {
        /// Maximum source file size accepted by `open_file` (10MB)
        /// SECURITY: Prevents unbounded reads from oversized inputs
        pub const MAX_FILE_SIZE: u64 = 10 * 1024 * 1024;

        /// Read buffer capacity for reader-backed character sources
        /// PERFORMANCE: Controls how many bytes are pulled per refill
        pub const READ_BUFFER_SIZE: usize = 8 * 1024;
    }

    pub mod patterns {
        /// Maximum pattern or name length in characters
        /// SECURITY: Rejects absurd keys before any trie traversal
        pub const MAX_PATTERN_LENGTH: usize = 1024;

        /// Maximum number of segments in a pattern or name
        /// RESOURCE: Bounds trie depth
        pub const MAX_PATTERN_SEGMENTS: usize = 128;
    }

    pub mod scan {
        /// Upper bound on diagnostics a single scan report may hold
        /// RESOURCE: Keeps reports for badly malformed input bounded
        pub const MAX_REPORTED_DIAGNOSTICS: usize = 1000;
    }

    pub mod logging {
        /// Maximum events retained by the in-memory logger
        pub const LOG_BUFFER_SIZE: usize = 1000;

        /// Messages longer than this are truncated when formatted
        pub const MAX_LOG_MESSAGE_LENGTH: usize = 2048;
    }
}
