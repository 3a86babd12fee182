pub mod elements;
pub mod keyword;
pub mod parser;

pub use elements::{SeasonEpisode, TitleParts};
pub use parser::episode::{has_episode_marker, parse_episode_marker, parse_title_numbering};
pub use parser::fields::{is_duration_text, parse_year, push_genres, split_genres};
pub use parser::title::split_title;
pub use parser::watch::{is_watch_url, video_id};
