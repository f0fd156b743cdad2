pub mod shared {
    pub mod constants;
    pub mod detection_box;
    pub mod frame;
    pub mod video_metadata;
}

pub mod detection {
    pub mod domain {
        pub mod face_detector;
    }
    pub mod infrastructure;
}

pub mod video {
    pub mod domain {
        pub mod frame_sampler;
        pub mod video_handle;
        pub mod video_reader;
    }
    pub mod infrastructure;
}

pub mod analysis {
    pub mod domain {
        pub mod analysis_summary;
        pub mod frame_stats;
        pub mod metrics_aggregator;
    }
}

pub mod feedback {
    pub mod domain {
        pub mod feedback_generator;
        pub mod feedback_report;
    }
}

pub mod pipeline {
    pub mod analyze_video_use_case;
    pub mod pipeline_logger;
}

pub use pipeline::analyze_video_use_case::{analyze_video, AnalysisError, AnalyzeVideoUseCase};
