mod dirinfo;
mod helpers;
