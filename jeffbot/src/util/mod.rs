pub use self::ext::{ChannelExt, MessageExt};

mod ext;
