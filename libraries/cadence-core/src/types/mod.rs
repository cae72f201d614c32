mod album;
mod ids;
mod playlist;
mod track;
mod user;

pub use album::{Album, CreateAlbum, HydratedAlbum};
pub use ids::{AlbumId, PlaylistId, TrackId, UserId};
pub use playlist::{
    CreatePlaylist, HydratedPlaylist, Playlist, PlaylistMembership, Privacy, UpdatePlaylist,
};
pub use track::{CreateTrack, Track, TrackWithArtist};
pub use user::{CreateUser, Role, User};
