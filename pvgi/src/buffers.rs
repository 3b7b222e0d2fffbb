mod bind_group;
mod bindable;
mod host_textures;
mod mapped_uniform_buffer;
mod texture;
mod volume_texture;

pub use self::bind_group::*;
pub use self::bindable::*;
pub use self::host_textures::*;
pub use self::mapped_uniform_buffer::*;
pub use self::texture::*;
pub use self::volume_texture::*;
